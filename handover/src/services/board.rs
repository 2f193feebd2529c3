//! Board service
//!
//! Assembles what one day's board shows: fetches the day's snapshot,
//! resolves the shift on duty, and runs the view pipeline at the clock's
//! current time. Every render starts from a fresh snapshot.

use super::schedule::ScheduleService;
use super::settings::SettingsService;
use crate::clock::Clock;
use crate::config::DEFAULT_STAFF_NAME;
use crate::database::{Note, Repository, Shift};
use crate::error::Result;
use crate::view::{self, DueLabel, Group, NoteGroups, ViewState};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One rendered day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub date: NaiveDate,
    pub shift: Shift,
    /// Empty when nobody is scheduled and fewer than two people are on staff
    pub shift_people: String,
    pub view: ViewState,
    pub groups: NoteGroups<Note>,
    pub due_labels: HashMap<String, DueLabel>,
    /// Notes stored for the day before filtering
    pub total_notes: usize,
}

impl BoardView {
    pub fn due_label(&self, note_id: &str) -> Option<&DueLabel> {
        self.due_labels.get(note_id)
    }

    fn write_note(&self, f: &mut fmt::Formatter<'_>, note: &Note) -> fmt::Result {
        let mark = if note.completed { "x" } else { " " };
        write!(f, "  [{}] {}", mark, note.category.display_name())?;
        if !note.room.is_empty() {
            write!(f, " | Room {}", note.room)?;
        }
        if !note.guest_name.is_empty() {
            write!(f, " | {}", note.guest_name)?;
        }
        if note.followup {
            f.write_str(" | FOLLOW-UP")?;
        }
        if let Some(label) = self.due_label(&note.id).filter(|l| l.has_due()) {
            write!(f, " | {}", label.text)?;
        }
        writeln!(f)?;

        writeln!(f, "      {}", note.text)?;
        if note.promised && !note.promise_text.is_empty() {
            writeln!(f, "      Promised: {}", note.promise_text)?;
        }
        for attachment in note.attachments.iter().filter(|a| a.is_previewable()) {
            writeln!(f, "      Attachment: {}", attachment.display_name())?;
        }

        let created = note.timestamp.with_timezone(&Local);
        writeln!(
            f,
            "      {} | {} shift | {}",
            created.format("%H:%M"),
            note.shift_or(self.shift),
            note.added_by
        )?;
        if let Some(edited_at) = note.edited_at {
            let editor = if note.edited_by.is_empty() {
                DEFAULT_STAFF_NAME
            } else {
                note.edited_by.as_str()
            };
            writeln!(
                f,
                "      Edited {} by {}",
                edited_at.with_timezone(&Local).format("%b %-d %H:%M"),
                editor
            )?;
        }
        Ok(())
    }
}

/// Plain-text board, as printed by the command line
impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handover {} | Shift {}", self.date, self.shift)?;
        if !self.shift_people.is_empty() {
            write!(f, " | {}", self.shift_people)?;
        }
        writeln!(
            f,
            "\nShowing {} of {} notes (sort: {})",
            self.groups.len(),
            self.total_notes,
            self.view.sort.as_str()
        )?;

        for group in Group::ALL {
            let notes = self.groups.get(group);
            writeln!(f, "\n== {} ({}) ==", group.title(), notes.len())?;
            if notes.is_empty() {
                writeln!(f, "  {}", group.empty_message())?;
                continue;
            }
            for note in notes {
                self.write_note(f, note)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct BoardService {
    repo: Repository,
    schedule: ScheduleService,
    settings: SettingsService,
    clock: Arc<dyn Clock>,
}

impl BoardService {
    pub fn new(
        repo: Repository,
        schedule: ScheduleService,
        settings: SettingsService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            schedule,
            settings,
            clock,
        }
    }

    /// The view state a day opens with: saved defaults, day's shift
    pub async fn initial_view(&self, date: NaiveDate) -> Result<ViewState> {
        let defaults = self.settings.get_view_defaults().await?;
        let shift = self.schedule.day_schedule(date).await?.shift;
        Ok(defaults.view_state(shift))
    }

    /// Renders a day. The shift on duty always comes from the schedule,
    /// whatever `view.current_shift` says.
    pub async fn render(&self, date: NaiveDate, view: ViewState) -> Result<BoardView> {
        let record = self.repo.fetch_day_record(date).await?;
        let schedule = self.schedule.day_schedule(date).await?;
        let shift_people = self.schedule.shift_people_label(date).await?;
        let view = view.with_shift(schedule.shift);
        let now = self.clock.now();

        let groups = view::build_view(&record, &view, now);
        let due_labels = view::due_labels(
            groups
                .unresolved
                .iter()
                .chain(&groups.general)
                .chain(&groups.completed)
                .copied(),
            now,
        );
        let groups = groups.map(Note::clone);

        tracing::debug!(
            "Rendered {}: {} of {} notes visible",
            date,
            groups.len(),
            record.notes.len()
        );

        Ok(BoardView {
            date,
            shift: schedule.shift,
            shift_people,
            view,
            groups,
            due_labels,
            total_notes: record.notes.len(),
        })
    }
}
