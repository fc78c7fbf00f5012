//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalogue record and its insert/update payloads.
//! - Normalize and validate user-provided text before it reaches storage.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes for a record.
//! - `title` and `author` are never empty after trimming.
//! - `genre` is either `None` or a non-empty trimmed string.
//! - `status` is always one of [`ReadingStatus::Read`] / [`ReadingStatus::Unread`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned book identifier.
pub type BookId = i64;

pub const TITLE_MAX_CHARS: usize = 255;
pub const AUTHOR_MAX_CHARS: usize = 255;
pub const GENRE_MAX_CHARS: usize = 100;

/// Reading state of a catalogued book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    Read,
    Unread,
}

impl ReadingStatus {
    /// Stable text form used in storage and display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Unread => "Unread",
        }
    }

    /// Parses the stored text form. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Read" => Some(Self::Read),
            "Unread" => Some(Self::Unread),
            _ => None,
        }
    }
}

impl Display for ReadingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted catalogue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub status: ReadingStatus,
}

/// Insert payload for a book that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub status: ReadingStatus,
}

impl NewBook {
    /// Builds a normalized payload.
    ///
    /// Surrounding whitespace is trimmed and a blank genre becomes `None`.
    /// Call [`NewBook::validate`] (repositories do) before persisting.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: Option<String>,
        status: ReadingStatus,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            author: author.into().trim().to_string(),
            genre: normalize_genre(genre),
            status,
        }
    }

    /// Validates field invariants.
    ///
    /// # Errors
    /// - [`BookValidationError::EmptyTitle`] / [`BookValidationError::EmptyAuthor`]
    ///   when a required field is blank.
    /// - [`BookValidationError::TooLong`] when a field exceeds its column bound.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        validate_title(&self.title)?;
        validate_author(&self.author)?;
        validate_genre(self.genre.as_deref())
    }
}

/// Column tag for single-field updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Genre,
    Status,
}

impl BookField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Status => "status",
        }
    }
}

impl Display for BookField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change to exactly one mutable column of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpdate {
    Title(String),
    Author(String),
    /// `None` (or a blank string) clears the genre.
    Genre(Option<String>),
    Status(ReadingStatus),
}

impl BookUpdate {
    /// Returns the column this update touches.
    pub fn field(&self) -> BookField {
        match self {
            Self::Title(_) => BookField::Title,
            Self::Author(_) => BookField::Author,
            Self::Genre(_) => BookField::Genre,
            Self::Status(_) => BookField::Status,
        }
    }

    /// Returns a trimmed/normalized copy of this update.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Title(value) => Self::Title(value.trim().to_string()),
            Self::Author(value) => Self::Author(value.trim().to_string()),
            Self::Genre(value) => Self::Genre(normalize_genre(value.clone())),
            Self::Status(status) => Self::Status(*status),
        }
    }

    /// Validates the new value against the column invariants.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        match self {
            Self::Title(value) => validate_title(value),
            Self::Author(value) => validate_author(value),
            Self::Genre(value) => validate_genre(value.as_deref()),
            Self::Status(_) => Ok(()),
        }
    }

    /// Applies this update to an in-memory record.
    pub fn apply_to(&self, book: &mut Book) {
        match self.normalized() {
            Self::Title(value) => book.title = value,
            Self::Author(value) => book.author = value,
            Self::Genre(value) => book.genre = value,
            Self::Status(status) => book.status = status,
        }
    }
}

/// Validation failures for book fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    TooLong { field: BookField, max_chars: usize },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyAuthor => write!(f, "author cannot be empty"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} cannot exceed {max_chars} characters")
            }
        }
    }
}

impl Error for BookValidationError {}

fn normalize_genre(genre: Option<String>) -> Option<String> {
    genre
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_title(title: &str) -> Result<(), BookValidationError> {
    if title.trim().is_empty() {
        return Err(BookValidationError::EmptyTitle);
    }
    check_length(title, BookField::Title, TITLE_MAX_CHARS)
}

fn validate_author(author: &str) -> Result<(), BookValidationError> {
    if author.trim().is_empty() {
        return Err(BookValidationError::EmptyAuthor);
    }
    check_length(author, BookField::Author, AUTHOR_MAX_CHARS)
}

fn validate_genre(genre: Option<&str>) -> Result<(), BookValidationError> {
    match genre {
        Some(value) => check_length(value.trim(), BookField::Genre, GENRE_MAX_CHARS),
        None => Ok(()),
    }
}

fn check_length(
    value: &str,
    field: BookField,
    max_chars: usize,
) -> Result<(), BookValidationError> {
    if value.trim().chars().count() > max_chars {
        return Err(BookValidationError::TooLong { field, max_chars });
    }
    Ok(())
}
