use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub const DEFAULT_LIFE_WARNING_PERCENT: u8 = 40;

/// Settings of the `mapsight` binary, read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay between two frames.
    pub tick_interval_ms: u64,
    /// Executable name of the game.
    pub process_name: String,
    /// Warn when the local player's life drops below this share, outside towns.
    pub life_warning_percent: u8,
    /// Append a JSON line per ready frame to this file.
    pub snapshot_output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            process_name: "D2R.exe".to_string(),
            life_warning_percent: DEFAULT_LIFE_WARNING_PERCENT,
            snapshot_output: None,
        }
    }
}

impl Config {
    /// `config.toml` in the user's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mapsight").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config.validated())
    }

    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            warn!("No config directory available, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validated(mut self) -> Self {
        if !(1..=99).contains(&self.life_warning_percent) {
            error!(
                "life_warning_percent must be between 1 and 99, got {}; using {}",
                self.life_warning_percent, DEFAULT_LIFE_WARNING_PERCENT
            );
            self.life_warning_percent = DEFAULT_LIFE_WARNING_PERCENT;
        }
        if self.tick_interval_ms == 0 {
            warn!("tick_interval_ms of 0 would spin, using 1");
            self.tick_interval_ms = 1;
        }
        self
    }
}
