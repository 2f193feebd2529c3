//! Grouping stage

use crate::database::Note;
use serde::Serialize;

/// Board section a note is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Open and promised or flagged for follow-up
    Unresolved,
    General,
    Completed,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Unresolved, Group::General, Group::Completed];

    pub fn of(note: &Note) -> Self {
        if note.completed {
            Group::Completed
        } else if note.needs_attention() {
            Group::Unresolved
        } else {
            Group::General
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Group::Unresolved => "Unresolved / Important",
            Group::General => "General Notes",
            Group::Completed => "Completed",
        }
    }

    /// Placeholder shown when the section has nothing in it
    pub fn empty_message(&self) -> &'static str {
        match self {
            Group::Unresolved => "No Unresolved / Important Notes",
            Group::General => "No General Notes",
            Group::Completed => "No Completed Notes",
        }
    }
}

/// The three board sections, each in sorted order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteGroups<T> {
    pub unresolved: Vec<T>,
    pub general: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> Default for NoteGroups<T> {
    fn default() -> Self {
        Self {
            unresolved: Vec::new(),
            general: Vec::new(),
            completed: Vec::new(),
        }
    }
}

impl<T> NoteGroups<T> {
    pub fn get(&self, group: Group) -> &[T] {
        match group {
            Group::Unresolved => &self.unresolved,
            Group::General => &self.general,
            Group::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.unresolved.len() + self.general.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unresolved, then general, then completed
    pub fn into_concat(self) -> Vec<T> {
        let mut all = self.unresolved;
        all.extend(self.general);
        all.extend(self.completed);
        all
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> NoteGroups<U> {
        NoteGroups {
            unresolved: self.unresolved.into_iter().map(&mut f).collect(),
            general: self.general.into_iter().map(&mut f).collect(),
            completed: self.completed.into_iter().map(&mut f).collect(),
        }
    }
}

/// Splits sorted notes into sections without reordering them
pub fn partition<'a>(sorted: Vec<&'a Note>) -> NoteGroups<&'a Note> {
    let mut groups = NoteGroups::default();
    for note in sorted {
        match Group::of(note) {
            Group::Unresolved => groups.unresolved.push(note),
            Group::General => groups.general.push(note),
            Group::Completed => groups.completed.push(note),
        }
    }
    groups
}
