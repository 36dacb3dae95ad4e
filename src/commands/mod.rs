//! Command line dispatcher: argument parsing, field validation and rendering
//!
//! Each subcommand validates its raw values, calls into the [`Library`]
//! and produces a [`Response`]. Nothing here prints; `main` decides where
//! the rendered output goes.

pub mod borrowers;
pub mod loans;
pub mod materials;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{error::AppResult, storage::CatalogStorage, Library};

/// Libdesk library catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, layered over config/default.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding the backing files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Date to use as "today" (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register, edit and remove borrowers
    #[command(subcommand)]
    Borrower(borrowers::BorrowerCommand),
    /// Add, edit and remove materials
    #[command(subcommand)]
    Material(materials::MaterialCommand),
    /// Borrow a material
    Borrow(loans::BorrowArgs),
    /// Return the borrower's active loan
    Return(loans::ReturnArgs),
    /// Transaction history
    #[command(subcommand)]
    History(loans::HistoryCommand),
    /// Active loans past their due date
    Overdue,
    /// Report inconsistencies between the collections
    Check,
}

/// Result of one command
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Text output, one entry per line
    pub lines: Vec<String>,
    /// Machine-readable output for `--json`
    pub data: Value,
    /// Process exit status; non-zero when the command found problems
    pub status: i32,
}

impl Response {
    pub fn new(lines: Vec<String>, data: Value) -> Self {
        Self {
            lines,
            data,
            status: 0,
        }
    }

    pub fn message(message: impl Into<String>, data: Value) -> Self {
        Self::new(vec![message.into()], data)
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    pub fn render(&self, json: bool) -> String {
        if json {
            serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
        } else {
            self.lines.join("\n")
        }
    }
}

/// Run a parsed command against the library
pub fn run<S: CatalogStorage>(
    command: Command,
    library: &mut Library<S>,
    today: NaiveDate,
) -> AppResult<Response> {
    tracing::debug!("Running {:?} on {}", command, today);
    match command {
        Command::Borrower(cmd) => borrowers::run(cmd, library),
        Command::Material(cmd) => materials::run(cmd, library),
        Command::Borrow(args) => loans::borrow(args, library, today),
        Command::Return(args) => loans::return_loan(args, library, today),
        Command::History(cmd) => loans::history(cmd, library, today),
        Command::Overdue => Ok(loans::overdue(library, today)),
        Command::Check => Ok(loans::check(library)),
    }
}

/// Keep the value unless it is blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
