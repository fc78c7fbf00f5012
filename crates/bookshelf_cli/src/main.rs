//! Bookshelf console entry point.
//!
//! # Responsibility
//! - Load configuration, start file logging and open the catalogue database.
//! - Own the single connection for the whole session and run the menu.
//!
//! # Invariants
//! - A database that cannot be opened ends the process with a failure code.
//! - The connection outlives the menu and is closed when `main` returns.
//! - Terminal widgets are used only when both stdin and stdout are terminals;
//!   piped sessions read plain lines.

mod app;
mod console;
mod table;

use app::App;
use bookshelf_core::db::open_db;
use bookshelf_core::{init_logging, AppConfig, BookService, SqliteBookRepository};
use console::Console;
use log::{error, info};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.logging.level, &config.logging.dir) {
        eprintln!("Warning: file logging is disabled: {err}");
    }

    let db_path = config.database.database_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=app_start module=cli status=error error_code=db_unavailable");
            eprintln!("Could not open the catalogue database: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteBookRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("The catalogue database is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to catalogue database `{}`.", db_path.display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut console = Console::new(stdin.lock(), stdout.lock(), clear_screen);
    if clear_screen && stdin.is_terminal() {
        console = console.with_terminal_prompts();
    }
    let mut app = App::new(BookService::new(repo), console);

    match app.run() {
        Ok(()) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("Console error: {err}");
            ExitCode::FAILURE
        }
    }
}
