//! # Configuration Module
//!
//! Startup configuration for Shufflecast. Every option has a default, so an
//! empty (or absent) config file yields a working station rooted in the
//! platform data directory.
//!
//! ## Data Storage
//!
//! All state lives under `base_directory`:
//! - `position` - index of the last served track
//! - `playlist` - newline-delimited absolute paths of the current rotation
//! - `lock` - advisory lock taken for the duration of one invocation
//! - `playlist.log` (+ `.1`, `.2`, ...) - rotating diagnostic log
//!
//! Content roots default to `<base>/music` and `<base>/jingles`, each holding
//! one subdirectory per category.
//!
//! ## Config File
//!
//! JSON, any subset of the fields below:
//!
//! ```json
//! {
//!   "base_directory": "/srv/radio",
//!   "jingle_factor": 4,
//!   "default_track_count": 3,
//!   "jingle_categories": ["Station IDs"]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::schedule::{self, ScheduleSlot};

const APP_DIR: &str = "shufflecast";

/// Returns the platform-appropriate default base directory.
///
/// - **Linux**: `~/.local/share/shufflecast`
/// - **macOS**: `~/Library/Application Support/shufflecast`
/// - **Windows**: `%APPDATA%\shufflecast`
///
/// Falls back to a relative `shufflecast` directory when the platform data
/// directory cannot be determined. The directory is not created here; the
/// station creates it on first use.
#[must_use]
pub fn default_base_directory() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// Default location of the config file: `<config dir>/shufflecast/config.json`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// Rotation settings for the diagnostic log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// File name inside `base_directory`
    pub file_name: String,
    /// Size cap of the active file before it is rotated
    pub max_bytes: u64,
    /// Number of rotated backups kept (`.1` is the newest)
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_name: "playlist.log".to_string(),
            max_bytes: 1_024_000,
            max_files: 30,
        }
    }
}

/// Runtime configuration for one station.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for all state and, by default, all content
    pub base_directory: PathBuf,
    /// Music root holding one subdirectory per mood category
    pub music_directory: Option<PathBuf>,
    /// Jingles root holding one subdirectory per jingle category
    pub jingles_directory: Option<PathBuf>,
    /// Case-sensitive file name suffix of audio files
    pub extension: String,
    /// A jingle follows every `jingle_factor` music tracks (0 disables jingles)
    pub jingle_factor: usize,
    /// Tracks reported when the host gives no (valid) count
    pub default_track_count: usize,
    /// Largest count honoured; anything above falls back to the default
    pub max_track_count: usize,
    /// Time-of-day rotation of music categories
    pub schedule: Vec<ScheduleSlot>,
    /// Jingle categories, one picked at random per build
    pub jingle_categories: Vec<String>,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base_directory(default_base_directory())
    }
}

impl Config {
    /// Default configuration rooted at an explicit base directory.
    #[must_use]
    pub fn with_base_directory(base_directory: PathBuf) -> Self {
        Self {
            base_directory,
            music_directory: None,
            jingles_directory: None,
            extension: ".mp3".to_string(),
            jingle_factor: 2,
            default_track_count: 3,
            max_track_count: 1000,
            schedule: schedule::default_schedule(),
            jingle_categories: vec!["Saludos".to_string()],
            log: LogConfig::default(),
        }
    }

    /// Load configuration from `path`, or from the default config location.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Reject values the station cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> std::result::Result<(), Error> {
        if self.extension.is_empty() {
            return Err(Error::Config("extension must not be empty".into()));
        }
        if self.default_track_count == 0 {
            return Err(Error::Config("default_track_count must be >= 1".into()));
        }
        if self.default_track_count > self.max_track_count {
            return Err(Error::Config(
                "default_track_count must not exceed max_track_count".into(),
            ));
        }
        if self.log.max_bytes == 0 {
            return Err(Error::Config("log.max_bytes must be >= 1".into()));
        }
        if self.log.file_name.is_empty() {
            return Err(Error::Config("log.file_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn music_root(&self) -> PathBuf {
        self.music_directory
            .clone()
            .unwrap_or_else(|| self.base_directory.join("music"))
    }

    pub fn jingles_root(&self) -> PathBuf {
        self.jingles_directory
            .clone()
            .unwrap_or_else(|| self.base_directory.join("jingles"))
    }

    pub fn position_path(&self) -> PathBuf {
        self.base_directory.join("position")
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.base_directory.join("playlist")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.base_directory.join("lock")
    }

    pub fn log_path(&self) -> PathBuf {
        self.base_directory.join(&self.log.file_name)
    }
}
