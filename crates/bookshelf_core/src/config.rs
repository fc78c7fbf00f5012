//! Environment-driven configuration.
//!
//! # Responsibility
//! - Load `.env` (when present) and read `BOOKSHELF_*` variables.
//! - Build the database connection target and the log settings.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed ones are rejected.
//! - `log_dir` is always absolute.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_DIR: &str = "BOOKSHELF_DB_DIR";
pub const ENV_DB_NAME: &str = "BOOKSHELF_DB_NAME";
pub const ENV_LOG_LEVEL: &str = "BOOKSHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKSHELF_LOG_DIR";

const DEFAULT_DB_NAME: &str = "bookshelf";
const DB_FILE_EXTENSION: &str = "sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Where the catalogue database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub dir: PathBuf,
    pub name: String,
}

impl DbConfig {
    /// Connection target: `<dir>/<name>.sqlite3`.
    pub fn database_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{DB_FILE_EXTENSION}", self.name))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: DEFAULT_DB_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    /// Loads `.env` from the working directory, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case.
        dotenvy::dotenv().ok();
        let cwd = std::env::current_dir().map_err(|err| ConfigError::InvalidValue {
            key: ENV_LOG_DIR,
            message: format!("cannot resolve current directory: {err}"),
        })?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// `cwd` anchors relative log directories.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut database = DbConfig::default();
        if let Some(dir) = read(ENV_DB_DIR) {
            database.dir = PathBuf::from(dir);
        }
        if let Some(name) = read(ENV_DB_NAME) {
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::InvalidValue {
                    key: ENV_DB_NAME,
                    message: format!("`{name}` must be a plain name without path separators"),
                });
            }
            database.name = name;
        }

        let level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = match read(ENV_LOG_DIR) {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    cwd.join(dir)
                }
            }
            None => cwd.join("logs"),
        };

        Ok(Self {
            database,
            logging: LogConfig {
                level,
                dir: log_dir,
            },
        })
    }
}
