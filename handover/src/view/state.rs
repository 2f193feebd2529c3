//! View state
//!
//! Everything the board's controls can change, bundled into one immutable
//! value that is handed to the pipeline on each render. Mode strings coming
//! from the outside never fail to parse: unknown values fall back to the
//! default mode.

use crate::database::Shift;
use crate::error::AppError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied to the filtered notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(from = "String", into = "String")]
#[clap(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Priority,
    Custom,
    Room,
    Staff,
    DueDate,
}

impl SortMode {
    pub const ALL: [SortMode; 7] = [
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::Priority,
        SortMode::Custom,
        SortMode::Room,
        SortMode::Staff,
        SortMode::DueDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Priority => "priority",
            SortMode::Custom => "custom",
            SortMode::Room => "room",
            SortMode::Staff => "staff",
            SortMode::DueDate => "dueDate",
        }
    }

    /// Parses a control value, falling back to `newest`
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown sort mode {:?}, using newest", value);
            SortMode::default()
        })
    }
}

impl FromStr for SortMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown sort mode: {}", s)))
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        SortMode::from_param(&value)
    }
}

impl From<SortMode> for String {
    fn from(mode: SortMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Single-select filter from the board's filter dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(from = "String", into = "String")]
#[clap(rename_all = "lower")]
pub enum CategoryFilter {
    #[default]
    All,
    Promised,
    Followup,
    /// Due instant already passed
    Overdue,
    /// Promised and flagged for follow-up
    Urgent,
    Completed,
    Pending,
}

impl CategoryFilter {
    pub const ALL: [CategoryFilter; 7] = [
        CategoryFilter::All,
        CategoryFilter::Promised,
        CategoryFilter::Followup,
        CategoryFilter::Overdue,
        CategoryFilter::Urgent,
        CategoryFilter::Completed,
        CategoryFilter::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Promised => "promised",
            CategoryFilter::Followup => "followup",
            CategoryFilter::Overdue => "overdue",
            CategoryFilter::Urgent => "urgent",
            CategoryFilter::Completed => "completed",
            CategoryFilter::Pending => "pending",
        }
    }

    /// Parses a control value, falling back to `all`
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown filter {:?}, showing all", value);
            CategoryFilter::default()
        })
    }
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown filter: {}", s)))
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        CategoryFilter::from_param(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// Toggle buttons layered on top of the category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(from = "String", into = "String")]
#[clap(rename_all = "camelCase")]
pub enum QuickFilter {
    #[default]
    None,
    /// Notes written during the day's current shift
    MyShift,
    /// Promised or flagged for follow-up
    TodaysUrgent,
    Promised,
    Followup,
    OpenItems,
    Completed,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 7] = [
        QuickFilter::None,
        QuickFilter::MyShift,
        QuickFilter::TodaysUrgent,
        QuickFilter::Promised,
        QuickFilter::Followup,
        QuickFilter::OpenItems,
        QuickFilter::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::None => "",
            QuickFilter::MyShift => "myShift",
            QuickFilter::TodaysUrgent => "todaysUrgent",
            QuickFilter::Promised => "promised",
            QuickFilter::Followup => "followup",
            QuickFilter::OpenItems => "openItems",
            QuickFilter::Completed => "completed",
        }
    }

    /// Parses a control value, falling back to no quick filter
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown quick filter {:?}, ignoring", value);
            QuickFilter::default()
        })
    }
}

impl FromStr for QuickFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(QuickFilter::None);
        }
        QuickFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown quick filter: {}", s)))
    }
}

impl From<String> for QuickFilter {
    fn from(value: String) -> Self {
        QuickFilter::from_param(&value)
    }
}

impl From<QuickFilter> for String {
    fn from(filter: QuickFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// Snapshot of the board controls for one render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub search: String,
    pub category: CategoryFilter,
    pub quick: QuickFilter,
    pub sort: SortMode,
    /// Shift on duty for the displayed day
    pub current_shift: Shift,
}

impl ViewState {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_category(self, category: CategoryFilter) -> Self {
        Self { category, ..self }
    }

    pub fn with_quick(self, quick: QuickFilter) -> Self {
        Self { quick, ..self }
    }

    pub fn with_sort(self, sort: SortMode) -> Self {
        Self { sort, ..self }
    }

    pub fn with_shift(self, current_shift: Shift) -> Self {
        Self {
            current_shift,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_modes_fall_back() {
        assert_eq!(SortMode::from_param("alphabetical"), SortMode::Newest);
        assert_eq!(CategoryFilter::from_param("vip-only"), CategoryFilter::All);
        assert_eq!(QuickFilter::from_param("weekend"), QuickFilter::None);
    }

    #[test]
    fn test_known_modes_parse() {
        assert_eq!(SortMode::from_param("dueDate"), SortMode::DueDate);
        assert_eq!(SortMode::from_param("priority"), SortMode::Priority);
        assert_eq!(CategoryFilter::from_param("overdue"), CategoryFilter::Overdue);
        assert_eq!(QuickFilter::from_param("myShift"), QuickFilter::MyShift);
        assert_eq!(QuickFilter::from_param(""), QuickFilter::None);
    }

    #[test]
    fn test_view_state_serde_tolerates_unknown_modes() {
        let json = r#"{"search":"","category":"bogus","quick":"openItems","sort":"room","currentShift":"B"}"#;
        let state: ViewState = serde_json::from_str(json).unwrap();

        assert_eq!(state.category, CategoryFilter::All);
        assert_eq!(state.quick, QuickFilter::OpenItems);
        assert_eq!(state.sort, SortMode::Room);
        assert_eq!(state.current_shift, Shift::B);

        let back = serde_json::to_string(&state).unwrap();
        assert!(back.contains(r#""sort":"room""#));
    }
}
