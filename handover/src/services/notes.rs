//! Notes service
//!
//! Note lifecycle on top of the repository: input validation, author and
//! shift defaults taken from the day's schedule, completion, deletion and
//! custom-order moves.

use super::schedule::ScheduleService;
use crate::config::{
    DEFAULT_STAFF_NAME, MAX_ATTACHMENT_SIZE, MAX_FILENAME_LENGTH, MAX_ROOM_LENGTH,
};
use crate::database::{Attachment, DayRecord, HandoverUpdate, NewHandover, Note, Repository};
use crate::error::{AppError, Result};
use chrono::NaiveDate;

#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
    schedule: ScheduleService,
    fallback_name: String,
}

impl NotesService {
    pub fn new(repo: Repository, schedule: ScheduleService) -> Self {
        Self {
            repo,
            schedule,
            fallback_name: DEFAULT_STAFF_NAME.to_string(),
        }
    }

    /// Name recorded when nobody is scheduled and nobody is on staff
    pub fn with_fallback_name(self, fallback_name: impl Into<String>) -> Self {
        Self {
            fallback_name: fallback_name.into(),
            ..self
        }
    }

    /// Validates and stores a new note. A blank author becomes the day's
    /// scheduled people; a missing shift becomes the day's shift.
    pub async fn create_note(&self, mut draft: NewHandover) -> Result<Note> {
        draft.text = validate_text(&draft.text)?;
        draft.room = validate_room(&draft.room)?;
        draft.guest_name = draft.guest_name.trim().to_string();
        draft.attachments = validate_attachments(draft.attachments)?;
        if !draft.promised {
            draft.promise_text.clear();
        }

        if draft.added_by.trim().is_empty() {
            draft.added_by = self
                .schedule
                .author_for(draft.date, &self.fallback_name)
                .await?;
        }
        if draft.shift.is_none() {
            draft.shift = Some(self.schedule.day_schedule(draft.date).await?.shift);
        }

        tracing::info!(
            "Creating {} note for {} by {}",
            draft.category,
            draft.date,
            draft.added_by
        );

        let note = self.repo.create_note(draft).await?;

        tracing::info!("Note created successfully: {}", note.id);

        Ok(note)
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.repo.get_note(id).await
    }

    pub async fn day_record(&self, date: NaiveDate) -> Result<DayRecord> {
        self.repo.fetch_day_record(date).await
    }

    /// Applies an edit, stamping the day's shift people as the editor
    pub async fn edit_note(&self, id: &str, mut update: HandoverUpdate) -> Result<Note> {
        tracing::debug!("Editing note: {}", id);

        let current = self.repo.get_note(id).await?;

        update.text = update.text.as_deref().map(validate_text).transpose()?;
        update.room = update.room.as_deref().map(validate_room).transpose()?;
        update.guest_name = update.guest_name.map(|g| g.trim().to_string());
        update.attachments = update
            .attachments
            .map(validate_attachments)
            .transpose()?;
        if !update.promised.unwrap_or(current.promised) {
            update.promise_text = Some(String::new());
        }

        let editor = self
            .schedule
            .editor_for(current.date, &self.fallback_name)
            .await?;
        let note = self.repo.update_note(id, update, &editor).await?;

        tracing::debug!("Note updated successfully: {}", note.id);

        Ok(note)
    }

    /// Flips a note between open and completed
    pub async fn toggle_complete(&self, id: &str) -> Result<Note> {
        let note = self.repo.get_note(id).await?;
        self.repo.set_completed(id, !note.completed).await?;

        tracing::info!(
            "Note {} marked {}",
            id,
            if note.completed { "open" } else { "completed" }
        );

        self.repo.get_note(id).await
    }

    pub async fn bulk_toggle_complete(&self, ids: &[String]) -> Result<u64> {
        let toggled = self.repo.toggle_completed(ids).await?;
        tracing::info!("Toggled completion on {} notes", toggled);
        Ok(toggled)
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting note: {}", id);

        self.repo.delete_note(id).await?;

        tracing::info!("Note deleted successfully: {}", id);

        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[String]) -> Result<u64> {
        let deleted = self.repo.delete_notes(ids).await?;
        tracing::info!("Deleted {} of {} selected notes", deleted, ids.len());
        Ok(deleted)
    }

    /// Moves a note to `new_index` in the day's custom order (clamped to the
    /// end) and returns the stored order
    pub async fn move_note(
        &self,
        date: NaiveDate,
        id: &str,
        new_index: usize,
    ) -> Result<Vec<String>> {
        let record = self.repo.fetch_day_record(date).await?;
        let mut order = record.sort_order;

        let from = order
            .iter()
            .position(|existing| existing == id)
            .ok_or_else(|| AppError::NoteNotFound(id.to_string()))?;
        let moved = order.remove(from);
        let to = new_index.min(order.len());
        order.insert(to, moved);

        tracing::debug!("Moved note {} from {} to {} on {}", id, from, to, date);

        self.repo.save_sort_order(date, &order).await
    }
}

fn validate_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Note text cannot be empty".to_string()));
    }
    Ok(text.to_string())
}

fn validate_room(room: &str) -> Result<String> {
    let room = room.trim();
    if room.chars().count() > MAX_ROOM_LENGTH {
        return Err(AppError::Validation(format!(
            "Room must be at most {} characters",
            MAX_ROOM_LENGTH
        )));
    }
    Ok(room.to_string())
}

fn validate_attachments(attachments: Vec<Attachment>) -> Result<Vec<Attachment>> {
    attachments
        .into_iter()
        .map(|mut attachment| {
            if attachment.location().is_none() {
                return Err(AppError::Validation(format!(
                    "Attachment {} has no file key or URL",
                    attachment.display_name()
                )));
            }
            if attachment.size < 0 || attachment.size > MAX_ATTACHMENT_SIZE {
                return Err(AppError::Validation(format!(
                    "Attachment {} exceeds the {} MB limit",
                    attachment.display_name(),
                    MAX_ATTACHMENT_SIZE / (1024 * 1024)
                )));
            }
            attachment.filename = sanitize_filename(&attachment.filename);
            Ok(attachment)
        })
        .collect()
}

/// Strips path separators and NUL bytes and caps the length
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(MAX_FILENAME_LENGTH)
        .collect()
}
