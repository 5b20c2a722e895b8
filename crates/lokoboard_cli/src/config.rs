//! Runtime configuration.
//!
//! # Responsibility
//! - Read the optional TOML config file.
//! - Layer command-line overrides on top of file values and defaults.
//!
//! # Invariants
//! - Resolved paths are absolute; relative ones are joined to the base dir.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "lokoboard.toml";
pub const DEFAULT_DB_FILE: &str = "lokoboard.sqlite3";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Raw file contents; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl ConfigFile {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Loads `explicit` if given, else `base_dir/lokoboard.toml` when it
    /// exists, else an empty config.
    ///
    /// # Errors
    /// - `Read` when an explicit file is missing or unreadable.
    /// - `Parse` on malformed TOML or unknown keys.
    pub fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = base_dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::from_file(&fallback);
        }
        Ok(Self::default())
    }
}

impl AppConfig {
    /// Flag > file > default, per key.
    pub fn resolve(
        file: ConfigFile,
        overrides: Overrides,
        base_dir: &Path,
        default_level: &str,
    ) -> Self {
        let db_path = overrides
            .db_path
            .or(file.db_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
        let log_dir = file
            .log_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let log_level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| default_level.to_string());

        Self {
            db_path: absolutize(base_dir, db_path),
            log_level,
            log_dir: absolutize(base_dir, log_dir),
        }
    }
}

fn absolutize(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
