//! Due-label formatting
//!
//! Labels are relative to "now" and must be recomputed on every render.

use crate::config::{close_window, relative_label_window};
use crate::database::Note;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    /// Due within the hour
    Close,
    Overdue,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Neutral => "due-label",
            Severity::Close => "due-label due-close",
            Severity::Overdue => "due-label due-overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueLabel {
    pub text: String,
    pub severity: Severity,
}

impl DueLabel {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn has_due(&self) -> bool {
        self.text != NO_DUE_DATE
    }
}

const NO_DUE_DATE: &str = "No Due Date";

pub fn due_label(note: &Note, now: NaiveDateTime) -> DueLabel {
    let Some(due) = note.due_at() else {
        return DueLabel::new(NO_DUE_DATE, Severity::Neutral);
    };

    let delta = due - now;

    if delta < chrono::Duration::zero() {
        let late = -delta;
        let text = if late < chrono::Duration::hours(1) {
            format!("OVERDUE by {}m", late.num_minutes())
        } else {
            format!("OVERDUE by {}h", late.num_hours())
        };
        return DueLabel::new(text, Severity::Overdue);
    }

    if delta <= close_window() {
        return DueLabel::new(format!("Due in {}m", delta.num_minutes()), Severity::Close);
    }

    if delta <= relative_label_window() {
        return DueLabel::new(format!("Due in {}h", delta.num_hours()), Severity::Neutral);
    }

    DueLabel::new(
        format!("Due {}", due.format("%b %-d %H:%M")),
        Severity::Neutral,
    )
}
