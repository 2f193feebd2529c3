//! Application configuration constants
//!
//! Central location for defaults, thresholds and validation limits
//! used throughout the board.

use chrono::Duration;

// ===== Ingestion Defaults =====

/// Name shown for notes and edits with no recorded author
pub const DEFAULT_STAFF_NAME: &str = "Staff";

/// Separator used when several scheduled people share a shift
pub const PEOPLE_SEPARATOR: &str = " & ";

/// Due time assumed when a note only carries a due date
pub const DEFAULT_DUE_TIME: &str = "00:00";

/// Wire format of a day key and of a note's due date
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Wire format of a note's due time
pub const DUE_TIME_FORMAT: &str = "%H:%M";

// ===== Urgency Thresholds =====

/// Due within this window counts as "close"
pub fn close_window() -> Duration {
    Duration::hours(1)
}

/// Due within this window outranks promises in priority sort
pub fn day_window() -> Duration {
    Duration::hours(24)
}

/// Due labels switch from relative hours to a calendar date past this
pub fn relative_label_window() -> Duration {
    Duration::hours(48)
}

// ===== Validation Limits =====

/// Maximum attachment size in bytes (5 MiB)
pub const MAX_ATTACHMENT_SIZE: i64 = 5 * 1024 * 1024;

/// Maximum stored filename length
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Maximum room identifier length (matches the schema column width)
pub const MAX_ROOM_LENGTH: usize = 10;

/// Image extensions that can be previewed inline
pub const PREVIEWABLE_IMAGE_EXTENSIONS: &[&str] =
    &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

// ===== Storage =====

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "HANDOVER_DATA_DIR";

/// Data directory used when the environment does not name one
pub const DEFAULT_DATA_DIR: &str = "./data";

/// SQLite database filename inside the data directory
pub const DATABASE_FILENAME: &str = "handover.db";

/// Settings filename inside the data directory
pub const SETTINGS_FILENAME: &str = "settings.json";
