//! Database module
//!
//! SQLite persistence for the board:
//! - Schema and migrations
//! - Stored rows and the domain types they become
//! - Repository with the note, sort-order, people and schedule operations

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Connection options for the board database file. The path is handed to
/// SQLite as-is, never spliced into a connection URL.
fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
}

/// Opens the board database and brings its schema up to date
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening handover database at {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(db_path))
        .await?;

    initialize_database(&pool).await?;

    tracing::info!("Database pool ready");

    Ok(pool)
}
