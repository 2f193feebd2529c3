//! Settings service
//!
//! Board settings persisted as a JSON file in the data directory.

use crate::config::{DEFAULT_STAFF_NAME, SETTINGS_FILENAME};
use crate::database::Shift;
use crate::error::{AppError, Result};
use crate::view::{CategoryFilter, QuickFilter, SortMode, ViewState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// How the board opens before anyone touches the controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefaults {
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub quick: QuickFilter,
}

impl ViewDefaults {
    /// Initial view state for a day whose current shift is `shift`
    pub fn view_state(&self, shift: Shift) -> ViewState {
        ViewState::default()
            .with_sort(self.sort)
            .with_category(self.category)
            .with_quick(self.quick)
            .with_shift(shift)
    }
}

/// Board settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    #[serde(default)]
    pub view: ViewDefaults,
    /// Author recorded when nobody is scheduled or on staff
    #[serde(default = "default_staff_name")]
    pub fallback_staff_name: String,
}

fn default_staff_name() -> String {
    DEFAULT_STAFF_NAME.to_string()
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            view: ViewDefaults::default(),
            fallback_staff_name: default_staff_name(),
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILENAME),
        }
    }

    /// Load settings from disk, writing the defaults if the file is missing
    pub async fn load(&self) -> Result<BoardSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = BoardSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: BoardSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    pub async fn save(&self, settings: &BoardSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    pub async fn get_view_defaults(&self) -> Result<ViewDefaults> {
        Ok(self.load().await?.view)
    }

    pub async fn update_view_defaults(&self, view: ViewDefaults) -> Result<()> {
        let mut settings = self.load().await?;
        settings.view = view;
        self.save(&settings).await
    }

    pub async fn update_fallback_staff_name(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Fallback staff name cannot be empty".to_string(),
            ));
        }

        let mut settings = self.load().await?;
        settings.fallback_staff_name = name.to_string();
        self.save(&settings).await
    }
}
