//! Database models
//!
//! Rust structs representing stored entities. Raw rows are converted into
//! domain types exactly once, at ingestion, where every optional field gets
//! its default. Everything downstream works on fully populated values.

use crate::config::{
    DAY_KEY_FORMAT, DEFAULT_DUE_TIME, DEFAULT_STAFF_NAME, DUE_TIME_FORMAT,
    PREVIEWABLE_IMAGE_EXTENSIONS,
};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What a handover note is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
pub enum Category {
    Complaint,
    Request,
    Billing,
    LateCheckout,
    Vip,
    Incident,
    #[default]
    Info,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Complaint,
        Category::Request,
        Category::Billing,
        Category::LateCheckout,
        Category::Vip,
        Category::Incident,
        Category::Info,
    ];

    /// Stored form, also what search matches against
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Complaint => "complaint",
            Category::Request => "request",
            Category::Billing => "billing",
            Category::LateCheckout => "late-checkout",
            Category::Vip => "vip",
            Category::Incident => "incident",
            Category::Info => "info",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Complaint => "Complaint",
            Category::Request => "Request",
            Category::Billing => "Billing",
            Category::LateCheckout => "Late Checkout",
            Category::Vip => "VIP",
            Category::Incident => "Incident",
            Category::Info => "Info",
        }
    }

    /// Lenient parse for stored values: anything unrecognised is `Info`
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown category {:?}, treating as info", value);
            Category::Info
        })
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", s)))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work period a note or schedule entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[clap(rename_all = "verbatim")]
pub enum Shift {
    /// Morning
    #[default]
    A,
    /// Middle
    M,
    /// Afternoon
    B,
    /// Night
    C,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::A => "A",
            Shift::M => "M",
            Shift::B => "B",
            Shift::C => "C",
        }
    }

    /// Lenient parse for stored values: blank or unknown means unset
    pub fn from_stored(value: Option<&str>) -> Option<Self> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        match value.parse() {
            Ok(shift) => Some(shift),
            Err(_) => {
                tracing::warn!("Unknown shift {:?}, treating as unset", value);
                None
            }
        }
    }
}

impl FromStr for Shift {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Shift::A),
            "M" => Ok(Shift::M),
            "B" => Ok(Shift::B),
            "C" => Ok(Shift::C),
            _ => Err(AppError::Validation(format!("Unknown shift: {}", s))),
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File attached to a note. Only metadata lives here; the bytes are held by
/// an external object store (`file_key`) or, for older notes, a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "name")]
    pub filename: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default, alias = "mime_type")]
    pub content_type: String,
}

/// Where an attachment's bytes can be fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentLocation<'a> {
    Key(&'a str),
    Url(&'a str),
}

impl Attachment {
    pub fn location(&self) -> Option<AttachmentLocation<'_>> {
        if let Some(key) = self.file_key.as_deref().filter(|k| !k.is_empty()) {
            return Some(AttachmentLocation::Key(key));
        }
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(AttachmentLocation::Url)
    }

    pub fn display_name(&self) -> &str {
        if !self.filename.is_empty() {
            return &self.filename;
        }
        self.url
            .as_deref()
            .and_then(|u| u.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("attachment")
    }

    /// Images and PDFs can be shown inline; everything else is hidden
    pub fn is_previewable(&self) -> bool {
        let name = self.display_name().to_lowercase();
        let mime = self.content_type.to_lowercase();
        let is_image_ext = PREVIEWABLE_IMAGE_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(ext));
        is_image_ext
            || name.ends_with(".pdf")
            || mime.starts_with("image/")
            || mime == "application/pdf"
    }
}

/// A handover note with every default applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub date: NaiveDate,
    pub category: Category,
    pub room: String,
    pub guest_name: String,
    pub text: String,
    pub followup: bool,
    pub promised: bool,
    pub promise_text: String,
    pub attachments: Vec<Attachment>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub timestamp: DateTime<Utc>,
    pub completed: bool,
    pub added_by: String,
    pub shift: Option<Shift>,
    pub edited_at: Option<DateTime<Utc>>,
    pub edited_by: String,
}

impl Note {
    /// Due date and time combined; a bare due date means midnight
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        self.due_date
            .map(|date| date.and_time(self.due_time.unwrap_or_default()))
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.due_at().is_some_and(|due| due < now)
    }

    /// Promised to a guest or flagged for follow-up
    pub fn needs_attention(&self) -> bool {
        self.promised || self.followup
    }

    /// Promised and flagged for follow-up at the same time
    pub fn is_urgent(&self) -> bool {
        self.promised && self.followup
    }

    /// The note's shift, falling back to the day's current one
    pub fn shift_or(&self, current: Shift) -> Shift {
        self.shift.unwrap_or(current)
    }
}

/// One day's notes plus the user's custom arrangement of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    pub notes: Vec<Note>,
    pub sort_order: Vec<String>,
}

impl DayRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            notes: Vec::new(),
            sort_order: Vec::new(),
        }
    }

    /// Drops duplicate and unknown ids from the custom order, then appends
    /// every note id it does not mention, in note order.
    pub fn normalize_sort_order(&mut self) {
        let known: HashSet<&str> = self.notes.iter().map(|n| n.id.as_str()).collect();
        let mut seen: HashSet<String> = HashSet::with_capacity(self.notes.len());
        let mut order: Vec<String> = Vec::with_capacity(self.notes.len());

        for id in &self.sort_order {
            if known.contains(id.as_str()) && seen.insert(id.clone()) {
                order.push(id.clone());
            }
        }
        for note in &self.notes {
            if seen.insert(note.id.clone()) {
                order.push(note.id.clone());
            }
        }

        self.sort_order = order;
    }
}

/// Row in the `handovers` table
#[derive(Debug, Clone, FromRow)]
pub struct HandoverRow {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub room: Option<String>,
    pub guest_name: Option<String>,
    pub text: String,
    pub followup: bool,
    pub promised: bool,
    pub promise_text: Option<String>,
    /// JSON array of attachment metadata
    pub attachments_json: String,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub completed: bool,
    pub added_by: Option<String>,
    pub shift: Option<String>,
    pub edited_at: Option<DateTime<Utc>>,
    pub edited_by: Option<String>,
}

impl From<HandoverRow> for Note {
    fn from(row: HandoverRow) -> Self {
        let attachments = parse_attachments(&row.id, &row.attachments_json);
        let (due_date, due_time) =
            parse_due(&row.id, row.due_date.as_deref(), row.due_time.as_deref());
        let added_by = row
            .added_by
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STAFF_NAME.to_string());

        Note {
            category: Category::from_stored(&row.category),
            shift: Shift::from_stored(row.shift.as_deref()),
            id: row.id,
            date: row.date,
            room: row.room.unwrap_or_default(),
            guest_name: row.guest_name.unwrap_or_default(),
            text: row.text,
            followup: row.followup,
            promised: row.promised,
            promise_text: row.promise_text.unwrap_or_default(),
            attachments,
            due_date,
            due_time,
            timestamp: row.timestamp,
            completed: row.completed,
            added_by,
            edited_at: row.edited_at,
            edited_by: row.edited_by.unwrap_or_default(),
        }
    }
}

fn parse_attachments(note_id: &str, json: &str) -> Vec<Attachment> {
    if json.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed attachments on note {}: {}", note_id, e);
        Vec::new()
    })
}

/// Parses stored due date/time strings. A note whose due date or time
/// cannot be read is treated as having no due date at all.
pub fn parse_due(
    note_id: &str,
    date: Option<&str>,
    time: Option<&str>,
) -> (Option<NaiveDate>, Option<NaiveTime>) {
    let Some(date_str) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return (None, None);
    };
    let time_str = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_DUE_TIME);

    match (
        NaiveDate::parse_from_str(date_str, DAY_KEY_FORMAT),
        NaiveTime::parse_from_str(time_str, DUE_TIME_FORMAT),
    ) {
        (Ok(d), Ok(t)) => (Some(d), Some(t)),
        _ => {
            tracing::warn!(
                "Unreadable due date {:?} {:?} on note {}, treating as no due date",
                date_str,
                time_str,
                note_id
            );
            (None, None)
        }
    }
}

/// Create note request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHandover {
    pub date: NaiveDate,
    pub category: Category,
    pub room: String,
    pub guest_name: String,
    pub text: String,
    pub followup: bool,
    pub promised: bool,
    pub promise_text: String,
    pub attachments: Vec<Attachment>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub added_by: String,
    pub shift: Option<Shift>,
}

/// Partial update of a note; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandoverUpdate {
    pub category: Option<Category>,
    pub room: Option<String>,
    pub guest_name: Option<String>,
    pub text: Option<String>,
    pub followup: Option<bool>,
    pub promised: Option<bool>,
    pub promise_text: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<NaiveTime>>,
    pub completed: Option<bool>,
}

impl HandoverUpdate {
    /// Overwrites the fields this update carries
    pub fn apply_to(self, note: &mut Note) {
        if let Some(category) = self.category {
            note.category = category;
        }
        if let Some(room) = self.room {
            note.room = room;
        }
        if let Some(guest_name) = self.guest_name {
            note.guest_name = guest_name;
        }
        if let Some(text) = self.text {
            note.text = text;
        }
        if let Some(followup) = self.followup {
            note.followup = followup;
        }
        if let Some(promised) = self.promised {
            note.promised = promised;
        }
        if let Some(promise_text) = self.promise_text {
            note.promise_text = promise_text;
        }
        if let Some(attachments) = self.attachments {
            note.attachments = attachments;
        }
        if let Some(due_date) = self.due_date {
            note.due_date = due_date;
        }
        if let Some(due_time) = self.due_time {
            note.due_time = due_time;
        }
        if let Some(completed) = self.completed {
            note.completed = completed;
        }
    }
}

/// Staff member
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Hex color used for the people block
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Row in the `schedules` table
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub shift: String,
    /// JSON array of person names
    pub people_json: String,
    pub updated_at: DateTime<Utc>,
}

/// Who works which shift on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub shift: Shift,
    pub people: Vec<String>,
}

impl Schedule {
    pub fn unscheduled(date: NaiveDate) -> Self {
        Self {
            date,
            shift: Shift::default(),
            people: Vec::new(),
        }
    }
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        let people = serde_json::from_str(&row.people_json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed people list for {}: {}", row.date, e);
            Vec::new()
        });
        Schedule {
            date: row.date,
            shift: Shift::from_stored(Some(row.shift.as_str())).unwrap_or_default(),
            people,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> HandoverRow {
        HandoverRow {
            id: "n1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category: "late-checkout".to_string(),
            room: None,
            guest_name: None,
            text: "Guest asked for 2pm checkout".to_string(),
            followup: false,
            promised: true,
            promise_text: None,
            attachments_json: "[]".to_string(),
            due_date: None,
            due_time: None,
            timestamp: Utc::now(),
            completed: false,
            added_by: None,
            shift: None,
            edited_at: None,
            edited_by: None,
        }
    }

    #[test]
    fn test_ingestion_applies_defaults() {
        let note = Note::from(row());

        assert_eq!(note.category, Category::LateCheckout);
        assert_eq!(note.room, "");
        assert_eq!(note.guest_name, "");
        assert_eq!(note.added_by, "Staff");
        assert_eq!(note.shift, None);
        assert!(note.attachments.is_empty());
        assert!(note.due_at().is_none());
    }

    #[test]
    fn test_unknown_category_falls_back_to_info() {
        let mut r = row();
        r.category = "lost-and-found".to_string();
        assert_eq!(Note::from(r).category, Category::Info);
    }

    #[test]
    fn test_due_date_without_time_is_midnight() {
        let mut r = row();
        r.due_date = Some("2024-03-02".to_string());
        let note = Note::from(r);

        let expected = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(note.due_at(), Some(expected));
    }

    #[test]
    fn test_malformed_due_time_drops_due_date() {
        let mut r = row();
        r.due_date = Some("2024-03-02".to_string());
        r.due_time = Some("25:99".to_string());
        let note = Note::from(r);

        assert!(note.due_date.is_none());
        assert!(note.due_at().is_none());
    }

    #[test]
    fn test_malformed_attachments_become_empty() {
        let mut r = row();
        r.attachments_json = "{not json".to_string();
        assert!(Note::from(r).attachments.is_empty());
    }

    #[test]
    fn test_legacy_attachment_fields() {
        let json = r#"[{"url":"https://cdn.example.com/scan.pdf","name":"scan.pdf"},
                       {"file_key":"k/123","filename":"photo.JPG","size":10,"content_type":"image/jpeg"},
                       {"file_key":"k/456","filename":"notes.docx","content_type":"application/msword"}]"#;
        let attachments: Vec<Attachment> = serde_json::from_str(json).unwrap();

        assert_eq!(
            attachments[0].location(),
            Some(AttachmentLocation::Url("https://cdn.example.com/scan.pdf"))
        );
        assert_eq!(attachments[0].display_name(), "scan.pdf");
        assert!(attachments[0].is_previewable());

        assert_eq!(attachments[1].location(), Some(AttachmentLocation::Key("k/123")));
        assert!(attachments[1].is_previewable());

        assert!(!attachments[2].is_previewable());
    }

    #[test]
    fn test_shift_and_category_parsing() {
        assert_eq!("b".parse::<Shift>().unwrap(), Shift::B);
        assert!("D".parse::<Shift>().is_err());
        assert_eq!(Shift::from_stored(Some("  ")), None);
        assert_eq!("Late Checkout".parse::<Category>().unwrap(), Category::LateCheckout);
        assert!("spa".parse::<Category>().is_err());
    }

    #[test]
    fn test_normalize_sort_order() {
        let mut first = Note::from(row());
        first.id = "a".to_string();
        let mut second = first.clone();
        second.id = "b".to_string();
        let mut third = first.clone();
        third.id = "c".to_string();

        let mut record = DayRecord {
            date: first.date,
            notes: vec![first, second, third],
            sort_order: vec![
                "c".to_string(),
                "ghost".to_string(),
                "c".to_string(),
                "a".to_string(),
            ],
        };
        record.normalize_sort_order();

        assert_eq!(record.sort_order, vec!["c", "a", "b"]);
    }
}
