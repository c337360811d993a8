use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const DEFAULT_DURATION_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Length of a test in seconds
    pub duration_secs: u64,
    /// Persist the final WPM so the next run can show it as the last score
    pub save_score: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            save_score: true,
        }
    }
}

impl Config {
    /// Zero-length tests make no sense; fall back to the default duration.
    pub fn sanitized(mut self) -> Self {
        if self.duration_secs == 0 {
            log::warn!("Ignoring zero test duration in config");
            self.duration_secs = DEFAULT_DURATION_SECS;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg.sanitized(),
                Err(e) => {
                    log::warn!("Ignoring unreadable config {}: {e}", self.path.display());
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
