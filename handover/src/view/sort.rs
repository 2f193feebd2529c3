//! Sort stage
//!
//! Every mode yields a total order: ties fall through to a secondary key
//! and finally to the note id, so the same input always renders the same
//! way. The custom mode is the exception for notes missing from the saved
//! order, which keep their incoming relative order.

use super::state::SortMode;
use crate::config::{close_window, day_window};
use crate::database::Note;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::iter::Peekable;
use std::str::Chars;

/// How pressing a note is, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
    Overdue,
    DueWithinHour,
    /// Promised and flagged for follow-up, no due date
    PromisedAndFollowup,
    DueWithinDay,
    /// Promised or flagged for follow-up, no due date
    PromisedOrFollowup,
    DueLater,
    Routine,
}

impl Urgency {
    pub fn of(note: &Note, now: NaiveDateTime) -> Self {
        if let Some(due) = note.due_at() {
            let remaining = due - now;
            return if remaining < chrono::Duration::zero() {
                Urgency::Overdue
            } else if remaining < close_window() {
                Urgency::DueWithinHour
            } else if remaining < day_window() {
                Urgency::DueWithinDay
            } else {
                Urgency::DueLater
            };
        }

        if note.is_urgent() {
            Urgency::PromisedAndFollowup
        } else if note.needs_attention() {
            Urgency::PromisedOrFollowup
        } else {
            Urgency::Routine
        }
    }
}

pub fn sort_notes<'a>(
    mut notes: Vec<&'a Note>,
    mode: SortMode,
    sort_order: &[String],
    now: NaiveDateTime,
) -> Vec<&'a Note> {
    match mode {
        SortMode::Newest => notes.sort_by(|a, b| newest_first(a, b)),
        SortMode::Oldest => notes.sort_by(|a, b| oldest_first(a, b)),
        SortMode::Priority => notes.sort_by(|a, b| {
            Urgency::of(a, now)
                .cmp(&Urgency::of(b, now))
                .then_with(|| newest_first(a, b))
        }),
        SortMode::Room => notes.sort_by(|a, b| {
            natural_cmp(&a.room, &b.room).then_with(|| newest_first(a, b))
        }),
        SortMode::Staff => notes.sort_by(|a, b| {
            a.added_by
                .to_lowercase()
                .cmp(&b.added_by.to_lowercase())
                .then_with(|| a.added_by.cmp(&b.added_by))
                .then_with(|| newest_first(a, b))
        }),
        SortMode::DueDate => notes.sort_by(|a, b| by_due_date(a, b)),
        SortMode::Custom => return apply_custom_order(notes, sort_order),
    }
    notes
}

fn newest_first(a: &Note, b: &Note) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id))
}

fn oldest_first(a: &Note, b: &Note) -> Ordering {
    a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id))
}

/// Dated notes first by due instant, undated ones after them by age
fn by_due_date(a: &Note, b: &Note) -> Ordering {
    match (a.due_at(), b.due_at()) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| oldest_first(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => oldest_first(a, b),
    }
}

/// Lookup from note id to note, used to replay a saved arrangement
pub fn index_by_id<'a>(notes: &[&'a Note]) -> HashMap<&'a str, &'a Note> {
    notes.iter().map(|note| (note.id.as_str(), *note)).collect()
}

/// Replays the saved order over the filtered notes. Ids that were filtered
/// out or deleted are skipped; notes the order does not mention follow in
/// their incoming order.
pub fn apply_custom_order<'a>(notes: Vec<&'a Note>, sort_order: &[String]) -> Vec<&'a Note> {
    let by_id = index_by_id(&notes);
    let mut placed: HashSet<&str> = HashSet::with_capacity(notes.len());
    let mut ordered: Vec<&'a Note> = Vec::with_capacity(notes.len());

    for id in sort_order {
        if let Some(&note) = by_id.get(id.as_str()) {
            if placed.insert(note.id.as_str()) {
                ordered.push(note);
            }
        }
    }

    for note in notes {
        if placed.insert(note.id.as_str()) {
            ordered.push(note);
        }
    }

    ordered
}

/// Compares strings the way people read room numbers: digit runs by value
/// ("9" < "10" < "101"), everything else case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ord = compare_numbers(&take_digits(&mut left), &take_digits(&mut right));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }

    a.cmp(b)
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
