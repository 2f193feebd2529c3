//! Note view pipeline
//!
//! Turns one day's notes into what the board shows:
//! filter, then sort, then group, plus a due label per visible note.
//! Everything here is synchronous and pure. Nothing returns an error.

pub mod due;
pub mod filter;
pub mod group;
pub mod sort;
pub mod state;

pub use due::{due_label, DueLabel, Severity};
pub use group::{Group, NoteGroups};
pub use sort::Urgency;
pub use state::{CategoryFilter, QuickFilter, SortMode, ViewState};

use crate::database::{DayRecord, Note};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Runs the full pipeline over a day's snapshot
pub fn build_view<'a>(
    record: &'a DayRecord,
    view: &ViewState,
    now: NaiveDateTime,
) -> NoteGroups<&'a Note> {
    let filtered = filter::apply(&record.notes, view, now);
    let sorted = sort::sort_notes(filtered, view.sort, &record.sort_order, now);
    group::partition(sorted)
}

/// Due label for every note, keyed by note id
pub fn due_labels<'a>(
    notes: impl IntoIterator<Item = &'a Note>,
    now: NaiveDateTime,
) -> HashMap<String, DueLabel> {
    notes
        .into_iter()
        .map(|note| (note.id.clone(), due_label(note, now)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::{at, created, note, now};
    use super::*;
    use crate::database::Shift;

    #[test]
    fn test_build_view_end_to_end() {
        let mut overdue = created("overdue", -30);
        overdue.promised = true;
        overdue.due_date = Some(at(-90).date());
        overdue.due_time = Some(at(-90).time());
        overdue.room = "301".to_string();
        let mut done = created("done", -20);
        done.completed = true;
        done.room = "301".to_string();
        let mut general = created("general", -10);
        general.room = "301".to_string();
        let mut elsewhere = created("elsewhere", -5);
        elsewhere.room = "412".to_string();

        let record = DayRecord {
            date: now().date(),
            notes: vec![overdue, done, general, elsewhere],
            sort_order: Vec::new(),
        };
        let view = ViewState::default()
            .with_search("301")
            .with_sort(SortMode::Priority);

        let groups = build_view(&record, &view, now());

        assert_eq!(groups.len(), 3);
        assert_eq!(groups.unresolved[0].id, "overdue");
        assert_eq!(groups.general[0].id, "general");
        assert_eq!(groups.completed[0].id, "done");

        let labels = due_labels(groups.into_concat(), now());
        assert_eq!(labels["overdue"].text, "OVERDUE by 1h");
        assert_eq!(labels["general"].text, "No Due Date");
        assert!(!labels.contains_key("elsewhere"));
    }

    #[test]
    fn test_build_view_custom_order_with_my_shift() {
        let mut a = note("a");
        a.shift = Some(Shift::A);
        let mut b = note("b");
        b.shift = Some(Shift::B);
        let c = note("c");

        let record = DayRecord {
            date: now().date(),
            notes: vec![a, b, c],
            sort_order: vec!["c".to_string(), "a".to_string(), "b".to_string()],
        };
        let view = ViewState::default()
            .with_sort(SortMode::Custom)
            .with_quick(QuickFilter::MyShift)
            .with_shift(Shift::B);

        let ids: Vec<&str> = build_view(&record, &view, now())
            .into_concat()
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();

        assert_eq!(ids, vec!["c", "b"]);
    }
}
