//! SQLite storage for the catalogue.
//!
//! # Responsibility
//! - Open and configure the catalogue connection.
//! - Create the `books` table on first use and track its schema version.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No book is read or written before the schema is applied.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure below the book repository.
#[derive(Debug)]
pub enum DbError {
    /// The catalogue file could not be opened or created at `path`.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// Any other SQLite failure on an open connection.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build with a schema this one cannot read.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open catalogue file `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalogue schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
