//! Schedule service
//!
//! Staff roster and the per-day shift assignment: which shift is on duty
//! and who is working it. Notes take their default author and shift from
//! here.

use crate::config::{DEFAULT_STAFF_NAME, PEOPLE_SEPARATOR};
use crate::database::{Person, Repository, Schedule, Shift};
use crate::error::{AppError, Result};
use chrono::NaiveDate;

/// Color given to people added without one
pub const DEFAULT_PERSON_COLOR: &str = "#6b7280";

#[derive(Clone)]
pub struct ScheduleService {
    repo: Repository,
}

impl ScheduleService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// The day's schedule; a day nobody scheduled runs shift A with no one
    /// assigned
    pub async fn day_schedule(&self, date: NaiveDate) -> Result<Schedule> {
        Ok(self
            .repo
            .get_schedule(date)
            .await?
            .unwrap_or_else(|| Schedule::unscheduled(date)))
    }

    /// Assigns a shift and its people to a day. Names are trimmed; blanks
    /// and repeats are dropped.
    pub async fn set_day_schedule(
        &self,
        date: NaiveDate,
        shift: Shift,
        people: Vec<String>,
    ) -> Result<Schedule> {
        let mut assigned: Vec<String> = Vec::with_capacity(people.len());
        for name in people {
            let name = name.trim();
            if !name.is_empty() && !assigned.iter().any(|n| n == name) {
                assigned.push(name.to_string());
            }
        }

        tracing::info!(
            "Scheduling shift {} on {}: {}",
            shift,
            date,
            assigned.join(PEOPLE_SEPARATOR)
        );

        self.repo.upsert_schedule(date, shift, &assigned).await
    }

    /// Clears a day's schedule; the day goes back to shift A with no one
    /// assigned
    pub async fn clear_day_schedule(&self, date: NaiveDate) -> Result<()> {
        self.repo.delete_schedule(date).await?;
        tracing::info!("Cleared schedule for {}", date);
        Ok(())
    }

    /// Who the board shows as working the day: the assigned people, else
    /// the first two people on staff, else nobody
    pub async fn shift_people_label(&self, date: NaiveDate) -> Result<String> {
        let schedule = self.day_schedule(date).await?;
        if !schedule.people.is_empty() {
            return Ok(schedule.people.join(PEOPLE_SEPARATOR));
        }

        let people = self.repo.list_people().await?;
        if people.len() >= 2 {
            return Ok(join_names(&people[..2]));
        }
        Ok(String::new())
    }

    /// Name recorded as a new note's author
    pub async fn author_for(&self, date: NaiveDate, fallback: &str) -> Result<String> {
        let schedule = self.day_schedule(date).await?;
        if !schedule.people.is_empty() {
            return Ok(schedule.people.join(PEOPLE_SEPARATOR));
        }

        let people = self.repo.list_people().await?;
        Ok(people
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| fallback_name(fallback)))
    }

    /// Name recorded on an edit: like the shift people label, but never
    /// empty
    pub async fn editor_for(&self, date: NaiveDate, fallback: &str) -> Result<String> {
        let label = self.shift_people_label(date).await?;
        if !label.is_empty() {
            return Ok(label);
        }

        let people = self.repo.list_people().await?;
        Ok(people
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| fallback_name(fallback)))
    }

    pub async fn list_people(&self) -> Result<Vec<Person>> {
        self.repo.list_people().await
    }

    pub async fn add_person(&self, name: &str, color: Option<&str>) -> Result<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_PERSON_COLOR);

        let person = self.repo.create_person(name, color).await?;
        tracing::info!("Added {} to staff", person.name);
        Ok(person)
    }

    /// Renames or recolors a person. Blank values leave the field as is.
    pub async fn update_person(
        &self,
        id: &str,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Person> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let color = color.map(str::trim).filter(|c| !c.is_empty());

        let person = self.repo.update_person(id, name, color).await?;
        tracing::info!("Updated {} on staff", person.name);
        Ok(person)
    }

    pub async fn remove_person(&self, id: &str) -> Result<()> {
        self.repo.delete_person(id).await?;
        tracing::info!("Removed person {} from staff", id);
        Ok(())
    }
}

fn join_names(people: &[Person]) -> String {
    people
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(PEOPLE_SEPARATOR)
}

fn fallback_name(fallback: &str) -> String {
    let fallback = fallback.trim();
    if fallback.is_empty() {
        DEFAULT_STAFF_NAME.to_string()
    } else {
        fallback.to_string()
    }
}
