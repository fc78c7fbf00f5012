//! Book use-case service.
//!
//! # Responsibility
//! - Provide stable catalogue entry points for console callers.
//! - Delegate persistence to repository implementations.
//! - Emit metadata-only diagnostic events for every operation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Log lines carry ids, counts and timings only, never titles or authors.

use crate::model::book::{Book, BookId, BookUpdate, NewBook};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use std::time::Instant;

/// Use-case service wrapper for book operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new book and returns it with its assigned id.
    pub fn add_book(&self, book: &NewBook) -> RepoResult<Book> {
        let started_at = Instant::now();
        let result = self.repo.create_book(book);
        match &result {
            Ok(created) => info!(
                "event=book_create module=service status=ok id={} duration_ms={}",
                created.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("book_create", None, err, started_at),
        }
        result
    }

    /// Lists the whole catalogue ordered by title.
    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        let started_at = Instant::now();
        let books = self.repo.list_books()?;
        debug!(
            "event=book_list module=service status=ok count={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    /// Gets one book by id.
    ///
    /// Returns [`RepoError::NotFound`] when the id does not exist.
    pub fn get_book(&self, id: BookId) -> RepoResult<Book> {
        self.repo.get_book(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Returns whether a book with this id exists.
    pub fn book_exists(&self, id: BookId) -> RepoResult<bool> {
        Ok(self.repo.get_book(id)?.is_some())
    }

    /// Updates one field of an existing book.
    ///
    /// Writing a value equal to the current one still counts as success.
    pub fn update_book(&self, id: BookId, update: &BookUpdate) -> RepoResult<Book> {
        let started_at = Instant::now();
        let result = self.repo.update_book(id, update);
        match &result {
            Ok(_) => info!(
                "event=book_update module=service status=ok id={} field={} duration_ms={}",
                id,
                update.field(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("book_update", Some(id), err, started_at),
        }
        result
    }

    /// Permanently deletes a book.
    pub fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_book(id);
        match &result {
            Ok(()) => info!(
                "event=book_delete module=service status=ok id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("book_delete", Some(id), err, started_at),
        }
        result
    }

    /// Searches title, author and genre for `term`, ignoring case.
    pub fn search_books(&self, term: &str) -> RepoResult<Vec<Book>> {
        let started_at = Instant::now();
        let books = self.repo.search_books(term)?;
        debug!(
            "event=book_search module=service status=ok term_chars={} hits={} duration_ms={}",
            term.chars().count(),
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }
}

fn log_failure(event: &str, id: Option<BookId>, err: &RepoError, started_at: Instant) {
    let error_code = match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::Db(_) => "db_failed",
        RepoError::NotFound(_) => "not_found",
        RepoError::Duplicate { .. } => "duplicate",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::UninitializedConnection { .. } | RepoError::MissingRequiredTable(_) => {
            "uninitialized_connection"
        }
    };
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    warn!(
        "event={} module=service status=error id={} duration_ms={} error_code={}",
        event,
        id,
        started_at.elapsed().as_millis(),
        error_code
    );
}
