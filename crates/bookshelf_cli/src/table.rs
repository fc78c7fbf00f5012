//! Fixed-width text table for book listings.

use bookshelf_core::{Book, BookId, ReadingStatus};
use tabled::settings::object::Columns;
use tabled::settings::{Modify, Style, Width};
use tabled::{Table, Tabled};

const COL_ID: usize = 5;
const COL_TITLE: usize = 40;
const COL_AUTHOR: usize = 25;
const COL_GENRE: usize = 15;
const COL_STATUS: usize = 12;

const WIDTHS: [usize; 5] = [COL_ID, COL_TITLE, COL_AUTHOR, COL_GENRE, COL_STATUS];
const ELLIPSIS: &str = "...";

pub const EMPTY_MESSAGE: &str = "No books registered or no results found.";

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: BookId,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "AUTHOR")]
    author: String,
    #[tabled(rename = "GENRE")]
    genre: String,
    #[tabled(rename = "STATUS")]
    status: ReadingStatus,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            status: book.status,
        }
    }
}

/// Renders `books` as a bordered table, or [`EMPTY_MESSAGE`] when there are none.
///
/// Every column has a fixed width; longer values are cut and end in `...`.
pub fn render_books(books: &[Book]) -> String {
    if books.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut table = Table::new(books.iter().map(BookRow::from));
    table.with(Style::ascii());
    for (column, width) in WIDTHS.into_iter().enumerate() {
        table
            .with(Modify::new(Columns::single(column)).with(Width::truncate(width).suffix(ELLIPSIS)))
            .with(Modify::new(Columns::single(column)).with(Width::increase(width)));
    }

    let mut rendered = table.to_string();
    rendered.push('\n');
    rendered
}
