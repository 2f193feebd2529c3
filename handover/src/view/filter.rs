//! Filter stage
//!
//! Three independent predicates (search, category filter, quick filter)
//! combined with logical AND.

use super::state::{CategoryFilter, QuickFilter, ViewState};
use crate::database::{Note, Shift};
use chrono::NaiveDateTime;

/// Keeps the notes that pass every active predicate, in input order
pub fn apply<'a>(notes: &'a [Note], view: &ViewState, now: NaiveDateTime) -> Vec<&'a Note> {
    let query = view.search.to_lowercase();

    notes
        .iter()
        .filter(|note| matches_search(note, &query))
        .filter(|note| matches_category(note, view.category, now))
        .filter(|note| matches_quick(note, view.quick, view.current_shift))
        .collect()
}

/// Case-insensitive substring match on any searchable field.
/// `query` must already be lowercase; empty matches everything.
pub fn matches_search(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    [
        note.text.as_str(),
        note.room.as_str(),
        note.guest_name.as_str(),
        note.category.as_str(),
        note.added_by.as_str(),
        note.edited_by.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(query))
}

pub fn matches_category(note: &Note, filter: CategoryFilter, now: NaiveDateTime) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Promised => note.promised,
        CategoryFilter::Followup => note.followup,
        CategoryFilter::Overdue => note.is_overdue(now),
        CategoryFilter::Urgent => note.is_urgent(),
        CategoryFilter::Completed => note.completed,
        CategoryFilter::Pending => !note.completed,
    }
}

pub fn matches_quick(note: &Note, filter: QuickFilter, current_shift: Shift) -> bool {
    match filter {
        QuickFilter::None => true,
        QuickFilter::MyShift => note.shift_or(current_shift) == current_shift,
        QuickFilter::TodaysUrgent => note.needs_attention(),
        QuickFilter::Promised => note.promised,
        QuickFilter::Followup => note.followup,
        QuickFilter::OpenItems => !note.completed,
        QuickFilter::Completed => note.completed,
    }
}
