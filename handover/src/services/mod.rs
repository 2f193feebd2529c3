//! Services module
//!
//! Business logic that coordinates the repository, the schedule and the
//! view pipeline.

pub mod board;
pub mod notes;
pub mod schedule;
pub mod settings;

pub use board::{BoardService, BoardView};
pub use notes::NotesService;
pub use schedule::ScheduleService;
pub use settings::{BoardSettings, SettingsService, ViewDefaults};
