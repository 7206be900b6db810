use anyhow::{Context, Result};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ThrottleConfig {
    /// Maximum rate submissions per caller per window. Zero disables.
    pub max_submissions: u32,
    pub window_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig {
            max_submissions: 30,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Store location; defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Fixed UTC offset, in minutes, used for all calendar-day arithmetic.
    /// Defaults to +05:30 (IST), the market timezone.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

fn default_utc_offset_minutes() -> i32 {
    330
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            utc_offset_minutes: default_utc_offset_minutes(),
            throttle: ThrottleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when the file
    /// does not exist yet (the CLI must work before `setup` was ever run).
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "mandi", "mandi")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Directory the document store lives in.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let proj_dirs = ProjectDirs::from("in", "mandi", "mandi")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("store"))
    }

    pub fn tz(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .context("utc_offset_minutes is out of range")
    }
}
