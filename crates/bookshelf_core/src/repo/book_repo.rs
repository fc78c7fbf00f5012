//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and search APIs over the `books` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Every write runs in its own transaction; failures roll back.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List and search results are ordered by title, then id.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::book::{Book, BookId, BookUpdate, BookValidationError, NewBook, ReadingStatus};
use rusqlite::{ffi, params, Connection, ErrorCode, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    genre,
    status
FROM books";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    /// Another book already has the same title and author.
    Duplicate {
        title: String,
        author: String,
    },
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::Duplicate { title, author } => {
                write!(f, "a book titled `{title}` by `{author}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Duplicate { .. } => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD and search.
pub trait BookRepository {
    /// Inserts a book and returns the stored record with its new id.
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    /// Returns every book ordered by title.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Point lookup; `Ok(None)` when the id does not exist.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Changes exactly one column and returns the updated record.
    fn update_book(&self, id: BookId, update: &BookUpdate) -> RepoResult<Book>;
    /// Permanently removes a book.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    /// Case-insensitive substring search over title, author and genre.
    ///
    /// The term is not trimmed; an empty term returns the full catalogue.
    fn search_books(&self, term: &str) -> RepoResult<Vec<Book>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// Connections must come from [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`] so the schema is current.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'books'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("books"));
        }
        Ok(Self { conn })
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        let tx = self.begin()?;
        let inserted = tx.execute(
            "INSERT INTO books (title, author, genre, status)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.genre.as_deref(),
                book.status.as_str(),
            ],
        );
        if let Err(err) = inserted {
            return Err(map_write_error(err, &book.title, &book.author));
        }

        let id = tx.last_insert_rowid();
        let stored = load_book(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted book {id} could not be read back"))
        })?;
        tx.commit()?;

        Ok(stored)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY title ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        load_book(self.conn, id)
    }

    fn update_book(&self, id: BookId, update: &BookUpdate) -> RepoResult<Book> {
        let update = update.normalized();
        update.validate()?;

        let tx = self.begin()?;
        let Some(mut current) = load_book(&tx, id)? else {
            return Err(RepoError::NotFound(id));
        };

        let changed = match &update {
            BookUpdate::Title(value) => tx.execute(
                "UPDATE books SET title = ?1 WHERE id = ?2;",
                params![value.as_str(), id],
            ),
            BookUpdate::Author(value) => tx.execute(
                "UPDATE books SET author = ?1 WHERE id = ?2;",
                params![value.as_str(), id],
            ),
            BookUpdate::Genre(value) => tx.execute(
                "UPDATE books SET genre = ?1 WHERE id = ?2;",
                params![value.as_deref(), id],
            ),
            BookUpdate::Status(status) => tx.execute(
                "UPDATE books SET status = ?1 WHERE id = ?2;",
                params![status.as_str(), id],
            ),
        };

        update.apply_to(&mut current);
        let changed = match changed {
            Ok(changed) => changed,
            Err(err) => return Err(map_write_error(err, &current.title, &current.author)),
        };
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        Ok(current)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let tx = self.begin()?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn search_books(&self, term: &str) -> RepoResult<Vec<Book>> {
        // The term is matched as typed, surrounding spaces included; an empty
        // term matches every book.
        let needle = term.to_lowercase();

        // SQLite LIKE only folds ASCII case, so matching happens on the
        // Unicode-lowercased values here.
        let books = self
            .list_books()?
            .into_iter()
            .filter(|book| book_matches(book, needle.as_str()))
            .collect();
        Ok(books)
    }
}

fn book_matches(book: &Book, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle)
        || book.author.to_lowercase().contains(needle)
        || book
            .genre
            .as_deref()
            .is_some_and(|genre| genre.to_lowercase().contains(needle))
}

fn load_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }

    Ok(None)
}

fn map_write_error(err: rusqlite::Error, title: &str, author: &str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Duplicate {
            title: title.to_string(),
            author: author.to_string(),
        };
    }
    RepoError::from(err)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = ReadingStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in books.status"))
    })?;

    let book = Book {
        id,
        title: row.get("title")?,
        author: row.get("author")?,
        genre: row.get("genre")?,
        status,
    };
    if book.title.trim().is_empty() || book.author.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "book {id} has an empty title or author"
        )));
    }
    Ok(book)
}
