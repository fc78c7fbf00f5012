//! Interactive catalogue menu.
//!
//! # Responsibility
//! - Run the numbered menu loop and dispatch each choice to its sub-flow.
//! - Translate store failures into messages; only I/O errors end the loop.
//!
//! # Invariants
//! - Every sub-flow returns to the menu; only `Exit` (or closed input) stops it.
//! - Update and delete act only on ids confirmed to exist.

use crate::console::Console;
use crate::table::render_books;
use bookshelf_core::{
    Book, BookId, BookRepository, BookService, BookUpdate, NewBook, RepoError, RepoResult,
};
use log::{debug, warn};
use std::io::{self, BufRead, Write};

const RULE: &str = "==================================================";

/// Top-level menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Search,
    Update,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::List),
            "3" => Some(Self::Search),
            "4" => Some(Self::Update),
            "5" => Some(Self::Delete),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct App<S: BookRepository, R, W> {
    service: BookService<S>,
    console: Console<R, W>,
}

impl<S: BookRepository, R: BufRead, W: Write> App<S, R, W> {
    pub fn new(service: BookService<S>, console: Console<R, W>) -> Self {
        Self { service, console }
    }

    #[cfg(test)]
    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// Runs the menu until the user exits or input closes.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;
            let answer = match self.console.ask("Select an option (1-6)") {
                Ok(answer) => answer,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("event=menu_input_closed module=cli status=ok");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            let Some(choice) = MenuChoice::parse(&answer) else {
                self.console
                    .println("\nInvalid option. Please enter a number from 1 to 6.")?;
                continue;
            };
            debug!("event=menu_select module=cli status=ok choice={choice:?}");

            let outcome = match choice {
                MenuChoice::Add => self.handle_add(),
                MenuChoice::List => self.handle_list(),
                MenuChoice::Search => self.handle_search(),
                MenuChoice::Update => self.handle_update(),
                MenuChoice::Delete => self.handle_delete(),
                MenuChoice::Exit => {
                    self.console
                        .println("\nThanks for using the Library Manager! Goodbye.")?;
                    return Ok(());
                }
            };

            match outcome {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.console.println(&format!("\n{RULE}"))?;
        self.console.println(" Library Manager")?;
        self.console.println(RULE)?;
        self.console.println("1. Add a new book")?;
        self.console.println("2. List all books")?;
        self.console.println("3. Search books")?;
        self.console.println("4. Update a book")?;
        self.console.println("5. Delete a book")?;
        self.console.println("6. Exit")?;
        self.console.println(RULE)
    }

    fn handle_add(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.println("\n--- ADD NEW BOOK ---")?;
        let title = self.console.ask_required("Title")?;
        let author = self.console.ask_required("Author")?;
        let genre = self.console.ask_required("Genre")?;
        let status = self.console.ask_status("Reading status")?;

        let new_book = NewBook::new(title, author, Some(genre), status);
        match self.service.add_book(&new_book) {
            Ok(book) => self.console.println(&format!(
                "\nBook '{}' by {} added with ID {}.",
                book.title, book.author, book.id
            )),
            Err(RepoError::Duplicate { .. }) => self.console.println(
                "\nCould not add the book: the same title and author are already catalogued.",
            ),
            Err(err) => self
                .console
                .println(&format!("\nCould not add the book: {err}")),
        }
    }

    fn handle_list(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.println("\n--- ALL BOOKS ---")?;
        let books = self.service.list_books();
        self.show_books(books).map(|_| ())
    }

    fn handle_search(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.println("\n--- SEARCH BOOKS ---")?;
        let term = self
            .console
            .ask_required("Search term (title, author or genre)")?;
        let books = self.service.search_books(&term);
        self.console
            .println(&format!("\nResults for: '{term}'"))?;
        self.show_books(books).map(|_| ())
    }

    fn handle_update(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.println("\n--- UPDATE BOOK ---")?;
        let books = self.service.list_books();
        if self.show_books(books)? == 0 {
            return Ok(());
        }

        let Some(id) = self.select_existing_id("ID of the book to update")? else {
            return Ok(());
        };

        self.console.println("\nWhich field do you want to update?")?;
        self.console.println("1. Title")?;
        self.console.println("2. Author")?;
        self.console.println("3. Genre")?;
        self.console.println("4. Reading status")?;
        let update = match self.console.ask_required("Select an option (1-4)")?.as_str() {
            "1" => BookUpdate::Title(self.console.ask_required("New title")?),
            "2" => BookUpdate::Author(self.console.ask_required("New author")?),
            "3" => BookUpdate::Genre(Some(self.console.ask_required("New genre")?)),
            "4" => BookUpdate::Status(self.console.ask_status("New status")?),
            _ => return self.console.println("Invalid option."),
        };

        match self.service.update_book(id, &update) {
            Ok(_) => self
                .console
                .println(&format!("\nBook ID {id} updated successfully.")),
            Err(err) => self
                .console
                .println(&format!("\nCould not update the book: {err}")),
        }
    }

    fn handle_delete(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.println("\n--- DELETE BOOK ---")?;
        let books = self.service.list_books();
        if self.show_books(books)? == 0 {
            return Ok(());
        }

        let Some(id) = self.select_existing_id("ID of the book to delete")? else {
            return Ok(());
        };

        let confirmed = self
            .console
            .confirm(&format!("Are you sure you want to delete book ID {id}?"))?;
        if !confirmed {
            return self.console.println("\nDeletion cancelled.");
        }

        match self.service.delete_book(id) {
            Ok(()) => self
                .console
                .println(&format!("\nBook ID {id} deleted successfully.")),
            Err(err) => self
                .console
                .println(&format!("\nCould not delete the book: {err}")),
        }
    }

    /// Prints a listing and returns how many books were shown.
    fn show_books(&mut self, books: RepoResult<Vec<Book>>) -> io::Result<usize> {
        match books {
            Ok(books) => {
                self.console.print(&format!("\n{}", render_books(&books)))?;
                Ok(books.len())
            }
            Err(err) => {
                self.report_store_error(&err)?;
                Ok(0)
            }
        }
    }

    /// Prompts until the id of an existing book is entered.
    ///
    /// Returns `None` when the store cannot answer the existence check.
    fn select_existing_id(&mut self, prompt: &str) -> io::Result<Option<BookId>> {
        loop {
            let id = self.console.ask_integer(prompt)?;
            match self.service.book_exists(id) {
                Ok(true) => return Ok(Some(id)),
                Ok(false) => self
                    .console
                    .println(&format!("No book found with ID {id}."))?,
                Err(err) => {
                    self.report_store_error(&err)?;
                    return Ok(None);
                }
            }
        }
    }

    fn report_store_error(&mut self, err: &RepoError) -> io::Result<()> {
        warn!("event=store_error module=cli status=error error={err}");
        self.console
            .println(&format!("\nThe catalogue could not be read: {err}"))
    }
}
