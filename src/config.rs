//! Browser configuration.
//!
//! Read from `config.toml` in the XDG config directory
//! (`$XDG_CONFIG_HOME/kestrel-browser/config.toml` on Linux) when present.
//! Every field has a default, so an empty or absent file is valid.
//!
//! ```toml
//! table_path = ".kestrel/kestrel_database.csv"
//! relayout_debounce_ms = 100
//! editor_program = "darktable"
//!
//! [scene_grid]
//! target_columns = 5
//! min_item_width = 280.0
//! margin = 40.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collaborators::DEFAULT_EDITOR;
use crate::error::ConfigError;
use crate::layout::GridConfig;
use crate::models::DEFAULT_TABLE_PATH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Record table location, relative to the selected root directory.
    pub table_path: PathBuf,
    /// Scene overview grid.
    pub scene_grid: GridConfig,
    /// Image grid of an opened scene.
    pub image_grid: GridConfig,
    /// Quiescence window before a resize triggers a relayout.
    pub relayout_debounce_ms: u64,
    /// Species named on a scene tile before "+ N more".
    pub species_preview_count: usize,
    /// Program used for "Open in editor".
    pub editor_program: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            scene_grid: GridConfig::SCENES,
            image_grid: GridConfig::SCENE_IMAGES,
            relayout_debounce_ms: 100,
            species_preview_count: 3,
            editor_program: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl BrowserConfig {
    /// Location of the user config file, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kestrel-browser")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the user config file, falling back to defaults when it is absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        info!(?path, "Loaded config");
        Ok(config)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, grid) in [("scene_grid", &self.scene_grid), ("image_grid", &self.image_grid)] {
            if grid.target_columns == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name}.target_columns must be at least 1"
                )));
            }
            if !(grid.min_item_width.is_finite() && grid.min_item_width > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name}.min_item_width must be a positive number"
                )));
            }
            if !(grid.margin.is_finite() && grid.margin >= 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name}.margin must not be negative"
                )));
            }
        }
        if self.table_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("table_path must not be empty".into()));
        }
        if self.editor_program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "editor_program must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn relayout_window(&self) -> Duration {
        Duration::from_millis(self.relayout_debounce_ms)
    }
}
