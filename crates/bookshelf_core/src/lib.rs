//! Record store for the Bookshelf catalogue.
//! This crate is the single source of truth for book invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DbConfig, LogConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{
    Book, BookField, BookId, BookUpdate, BookValidationError, NewBook, ReadingStatus,
};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::book_service::BookService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
