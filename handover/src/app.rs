//! Application state and initialization
//!
//! Opens the data directory and wires every service onto one shared
//! repository.

use crate::clock::{Clock, SystemClock};
use crate::config::{DATABASE_FILENAME, DATA_DIR_ENV, DEFAULT_DATA_DIR};
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{BoardService, NotesService, ScheduleService, SettingsService};
use std::path::PathBuf;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub notes: NotesService,
    pub schedule: ScheduleService,
    pub settings: SettingsService,
    pub board: BoardService,
}

impl AppState {
    /// Opens the board stored in `data_dir` using the system clock
    pub async fn initialize(data_dir: PathBuf) -> Result<Self> {
        Self::initialize_with_clock(data_dir, Arc::new(SystemClock)).await
    }

    pub async fn initialize_with_clock(data_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self> {
        tracing::info!("Initializing handover board in {:?}", data_dir);

        std::fs::create_dir_all(&data_dir)?;

        let pool = create_pool(&data_dir.join(DATABASE_FILENAME)).await?;
        let repo = Repository::new(pool);

        let settings = SettingsService::new(data_dir.clone());
        let board_settings = settings.load().await?;

        let schedule = ScheduleService::new(repo.clone());
        let notes = NotesService::new(repo.clone(), schedule.clone())
            .with_fallback_name(board_settings.fallback_staff_name);
        let board = BoardService::new(repo, schedule.clone(), settings.clone(), clock);

        tracing::info!("Handover board initialized successfully");

        Ok(Self {
            data_dir,
            notes,
            schedule,
            settings,
            board,
        })
    }
}

/// Data directory named by the environment, or the default
pub fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
