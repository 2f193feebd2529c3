//! Repository layer for database operations
//!
//! Notes, each day's custom sort order, people and shift schedules.
//! Operations that touch a note and its day's sort order run in one
//! transaction so the two never disagree.

use super::models::*;
use crate::config::{DAY_KEY_FORMAT, DUE_TIME_FORMAT};
use crate::error::{AppError, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Notes =====

    /// Stores a new note and appends it to its day's sort order
    pub async fn create_note(&self, req: NewHandover) -> Result<Note> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let attachments_json = serde_json::to_string(&req.attachments)?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, HandoverRow>(
            r#"
            INSERT INTO handovers (
                id, date, category, room, guest_name, text, followup, promised,
                promise_text, attachments_json, due_date, due_time, timestamp,
                completed, added_by, shift
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(req.date)
        .bind(req.category.as_str())
        .bind(&req.room)
        .bind(&req.guest_name)
        .bind(&req.text)
        .bind(req.followup)
        .bind(req.promised)
        .bind(&req.promise_text)
        .bind(&attachments_json)
        .bind(format_due_date(req.due_date))
        .bind(format_due_time(req.due_time))
        .bind(now)
        .bind(&req.added_by)
        .bind(req.shift.map(|s| s.as_str()))
        .fetch_one(&mut *tx)
        .await?;

        let mut order = load_sort_order(&mut tx, req.date).await?;
        order.push(id.clone());
        store_sort_order(&mut tx, req.date, &order).await?;

        tx.commit().await?;

        tracing::debug!("Created note {} for {}", id, req.date);
        Ok(row.into())
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        let row = sqlx::query_as::<_, HandoverRow>("SELECT * FROM handovers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(id.to_string()))?;

        Ok(row.into())
    }

    /// Notes of one day, newest first
    pub async fn list_notes_for_date(&self, date: NaiveDate) -> Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, HandoverRow>(
            r#"
            SELECT * FROM handovers
            WHERE date = ?
            ORDER BY timestamp DESC, id ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    /// Notes plus custom order for a day. A day with nothing stored yields
    /// an empty record.
    pub async fn fetch_day_record(&self, date: NaiveDate) -> Result<DayRecord> {
        let notes = self.list_notes_for_date(date).await?;

        let mut conn = self.pool.acquire().await?;
        let sort_order = load_sort_order(&mut conn, date).await?;

        let mut record = DayRecord {
            date,
            notes,
            sort_order,
        };
        record.normalize_sort_order();

        tracing::debug!("Fetched {} notes for {}", record.notes.len(), date);
        Ok(record)
    }

    /// Applies a partial update and stamps who edited the note.
    /// Creation time, author and shift never change.
    pub async fn update_note(
        &self,
        id: &str,
        update: HandoverUpdate,
        edited_by: &str,
    ) -> Result<Note> {
        let mut note = self.get_note(id).await?;
        update.apply_to(&mut note);
        let attachments_json = serde_json::to_string(&note.attachments)?;

        let rows = sqlx::query(
            r#"
            UPDATE handovers SET
                category = ?, room = ?, guest_name = ?, text = ?, followup = ?,
                promised = ?, promise_text = ?, attachments_json = ?, due_date = ?,
                due_time = ?, completed = ?, edited_at = ?, edited_by = ?
            WHERE id = ?
            "#,
        )
        .bind(note.category.as_str())
        .bind(&note.room)
        .bind(&note.guest_name)
        .bind(&note.text)
        .bind(note.followup)
        .bind(note.promised)
        .bind(&note.promise_text)
        .bind(&attachments_json)
        .bind(format_due_date(note.due_date))
        .bind(format_due_time(note.due_time))
        .bind(note.completed)
        .bind(Utc::now())
        .bind(edited_by)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NoteNotFound(id.to_string()));
        }

        tracing::debug!("Updated note {} (edited by {})", id, edited_by);
        self.get_note(id).await
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        let rows = sqlx::query("UPDATE handovers SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NoteNotFound(id.to_string()));
        }

        tracing::debug!("Set note {} completed = {}", id, completed);
        Ok(())
    }

    /// Flips the completed flag of every listed note once, in one
    /// transaction. Unknown and repeated ids are skipped; returns how many
    /// notes changed.
    pub async fn toggle_completed(&self, ids: &[String]) -> Result<u64> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(ids.len());
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            affected += sqlx::query("UPDATE handovers SET completed = NOT completed WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::debug!("Toggled completion on {} of {} notes", affected, ids.len());
        Ok(affected)
    }

    /// Permanently removes a note and drops it from its day's sort order
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let deleted = self.delete_notes(&[id.to_string()]).await?;
        if deleted == 0 {
            return Err(AppError::NoteNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Bulk delete in one transaction. Unknown ids are skipped; returns how
    /// many notes were removed.
    pub async fn delete_notes(&self, ids: &[String]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed: HashMap<NaiveDate, HashSet<String>> = HashMap::new();

        for id in ids {
            let date: Option<NaiveDate> =
                sqlx::query_scalar("DELETE FROM handovers WHERE id = ? RETURNING date")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            if let Some(date) = date {
                removed.entry(date).or_default().insert(id.clone());
            }
        }

        for (date, gone) in &removed {
            let order: Vec<String> = load_sort_order(&mut tx, *date)
                .await?
                .into_iter()
                .filter(|id| !gone.contains(id))
                .collect();
            store_sort_order(&mut tx, *date, &order).await?;
        }

        tx.commit().await?;

        let count: u64 = removed.values().map(|ids| ids.len() as u64).sum();
        tracing::debug!("Deleted {} notes", count);
        Ok(count)
    }

    // ===== Sort order =====

    /// Stores the custom arrangement for a day, keeping only the first
    /// occurrence of ids that belong to that day. Returns what was stored.
    pub async fn save_sort_order(&self, date: NaiveDate, ids: &[String]) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let known: HashSet<String> =
            sqlx::query_scalar::<_, String>("SELECT id FROM handovers WHERE date = ?")
                .bind(date)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();

        let mut seen: HashSet<&str> = HashSet::with_capacity(ids.len());
        let mut order: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if known.contains(id) && seen.insert(id.as_str()) {
                order.push(id.clone());
            }
        }

        store_sort_order(&mut tx, date, &order).await?;
        tx.commit().await?;

        tracing::debug!("Saved sort order for {} ({} ids)", date, order.len());
        Ok(order)
    }

    // ===== People =====

    /// Everyone on staff, in the order they were added
    pub async fn list_people(&self) -> Result<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT * FROM people ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    pub async fn create_person(&self, name: &str, color: &str) -> Result<Person> {
        let id = Uuid::new_v4().to_string();

        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (id, name, color, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created person {} ({})", name, id);
        Ok(person)
    }

    /// Renames or recolors a person; `None` keeps the current value
    pub async fn update_person(
        &self,
        id: &str,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Person> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people
            SET name = COALESCE(?, name),
                color = COALESCE(?, color)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(color)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::PersonNotFound(id.to_string()))?;

        tracing::debug!("Updated person {} ({})", person.name, id);
        Ok(person)
    }

    pub async fn delete_person(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM people WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::PersonNotFound(id.to_string()));
        }

        tracing::debug!("Deleted person {}", id);
        Ok(())
    }

    // ===== Schedules =====

    pub async fn get_schedule(&self, date: NaiveDate) -> Result<Option<Schedule>> {
        let row = sqlx::query_as::<_, ScheduleRow>("SELECT * FROM schedules WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Schedule::from))
    }

    pub async fn upsert_schedule(
        &self,
        date: NaiveDate,
        shift: Shift,
        people: &[String],
    ) -> Result<Schedule> {
        let people_json = serde_json::to_string(people)?;

        let row = sqlx::query_as::<_, ScheduleRow>(
            r#"
            INSERT INTO schedules (date, shift, people_json, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                shift = excluded.shift,
                people_json = excluded.people_json,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(shift.as_str())
        .bind(&people_json)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Scheduled shift {} for {} ({} people)", shift, date, people.len());
        Ok(row.into())
    }

    /// Removes a day's schedule, returning the day to its unscheduled
    /// defaults
    pub async fn delete_schedule(&self, date: NaiveDate) -> Result<()> {
        let rows = sqlx::query("DELETE FROM schedules WHERE date = ?")
            .bind(date)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ScheduleNotFound(date.to_string()));
        }

        tracing::debug!("Cleared schedule for {}", date);
        Ok(())
    }
}

async fn load_sort_order(conn: &mut SqliteConnection, date: NaiveDate) -> Result<Vec<String>> {
    let json: Option<String> =
        sqlx::query_scalar("SELECT note_ids_json FROM day_sort_orders WHERE date = ?")
            .bind(date)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(json) = json else {
        return Ok(Vec::new());
    };

    Ok(serde_json::from_str(&json).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed sort order for {}: {}", date, e);
        Vec::new()
    }))
}

async fn store_sort_order(conn: &mut SqliteConnection, date: NaiveDate, ids: &[String]) -> Result<()> {
    let json = serde_json::to_string(ids)?;

    sqlx::query(
        r#"
        INSERT INTO day_sort_orders (date, note_ids_json, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            note_ids_json = excluded.note_ids_json,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(date)
    .bind(&json)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn format_due_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DAY_KEY_FORMAT).to_string())
}

fn format_due_time(time: Option<NaiveTime>) -> Option<String> {
    time.map(|t| t.format(DUE_TIME_FORMAT).to_string())
}
