//! Prompts for the catalogue menu.
//!
//! A console reads either from a terminal, through `dialoguer` widgets, or
//! line by line from any reader, which is what scripted sessions use.
//!
//! # Invariants
//! - Prompts are flushed before reading.
//! - Answers come back trimmed.
//! - End of input surfaces as `UnexpectedEof` so callers never spin on a
//!   closed stdin.

use bookshelf_core::ReadingStatus;
use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::io::{self, BufRead, Write};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const EMPTY_ANSWER: &str = "Input cannot be empty. Please try again.";
const STATUS_ITEMS: [ReadingStatus; 2] = [ReadingStatus::Read, ReadingStatus::Unread];

pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
    /// Set when prompts go through terminal widgets instead of `input`.
    theme: Option<ColorfulTheme>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
            theme: None,
        }
    }

    /// Switches prompting to interactive terminal widgets on stdout.
    pub fn with_terminal_prompts(mut self) -> Self {
        self.theme = Some(ColorfulTheme::default());
        self
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    pub fn println(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            self.output.write_all(CLEAR_SCREEN.as_bytes())?;
            self.output.flush()?;
        }
        Ok(())
    }

    /// Asks for a free-form answer, which may be empty.
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        if let Some(theme) = &self.theme {
            self.output.flush()?;
            let answer: String = Input::with_theme(theme)
                .with_prompt(label)
                .allow_empty(true)
                .interact_text_on(&Term::stdout())
                .map_err(|dialoguer::Error::IO(err)| err)?;
            return Ok(answer.trim().to_string());
        }
        self.read_answer(&format!("{label}: "))
    }

    /// Re-prompts until a non-empty answer is given.
    pub fn ask_required(&mut self, label: &str) -> io::Result<String> {
        if let Some(theme) = &self.theme {
            self.output.flush()?;
            let answer: String = Input::with_theme(theme)
                .with_prompt(label)
                .validate_with(|value: &String| -> Result<(), &'static str> {
                    if value.trim().is_empty() {
                        Err(EMPTY_ANSWER)
                    } else {
                        Ok(())
                    }
                })
                .interact_text_on(&Term::stdout())
                .map_err(|dialoguer::Error::IO(err)| err)?;
            return Ok(answer.trim().to_string());
        }

        loop {
            let answer = self.read_answer(&format!("{label}: "))?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.println(EMPTY_ANSWER)?;
        }
    }

    /// Re-prompts until the answer parses as an integer.
    pub fn ask_integer(&mut self, label: &str) -> io::Result<i64> {
        if let Some(theme) = &self.theme {
            self.output.flush()?;
            let value: i64 = Input::with_theme(theme)
                .with_prompt(label)
                .interact_text_on(&Term::stdout())
                .map_err(|dialoguer::Error::IO(err)| err)?;
            return Ok(value);
        }

        loop {
            let answer = self.ask_required(label)?;
            match answer.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.println("Please enter a valid whole number for the ID.")?,
            }
        }
    }

    /// Asks for a reading status; line input must be `1` (Read) or `2` (Unread).
    pub fn ask_status(&mut self, label: &str) -> io::Result<ReadingStatus> {
        if let Some(theme) = &self.theme {
            self.output.flush()?;
            let picked = Select::with_theme(theme)
                .with_prompt(label)
                .items(&STATUS_ITEMS)
                .default(1)
                .interact_on(&Term::stdout())
                .map_err(|dialoguer::Error::IO(err)| err)?;
            return Ok(STATUS_ITEMS[picked]);
        }

        let prompt = format!("{label} (1: Read, 2: Unread): ");
        loop {
            match self.read_answer(&prompt)?.as_str() {
                "1" => return Ok(ReadingStatus::Read),
                "2" => return Ok(ReadingStatus::Unread),
                "" => self.println(EMPTY_ANSWER)?,
                _ => self.println("Invalid status option. Use '1' or '2'.")?,
            }
        }
    }

    /// `true` only for an explicit yes; anything else declines.
    pub fn confirm(&mut self, label: &str) -> io::Result<bool> {
        if let Some(theme) = &self.theme {
            self.output.flush()?;
            let confirmed = Confirm::with_theme(theme)
                .with_prompt(label)
                .default(false)
                .interact_on(&Term::stdout())
                .map_err(|dialoguer::Error::IO(err)| err)?;
            return Ok(confirmed);
        }
        Ok(self
            .read_answer(&format!("{label} (y/N): "))?
            .eq_ignore_ascii_case("y"))
    }

    fn read_answer(&mut self, prompt: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim().to_string())
    }
}
