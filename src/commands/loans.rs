//! Circulation subcommands: borrow, return, history and reports

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;

use super::Response;
use crate::{
    error::{AppResult, ErrorCode},
    models::transaction::LoanDetails,
    storage::CatalogStorage,
    Library,
};

#[derive(Debug, Args)]
pub struct BorrowArgs {
    /// Borrower ID
    pub borrower: String,
    /// Material ID
    pub material: String,
}

#[derive(Debug, Args)]
pub struct ReturnArgs {
    /// Borrower ID
    pub borrower: String,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// All transactions of a borrower
    Borrower { id: String },
    /// All transactions of a material
    Material { id: String },
    /// One transaction by ID
    Transaction { id: String },
}

pub fn borrow<S: CatalogStorage>(
    args: BorrowArgs,
    library: &mut Library<S>,
    today: NaiveDate,
) -> AppResult<Response> {
    let transaction = library.borrow(args.borrower.trim(), args.material.trim(), today)?;
    Ok(Response::message(
        format!(
            "Borrow successful. Due date: {}",
            transaction.due_date.format("%Y-%m-%d")
        ),
        json!(transaction),
    ))
}

pub fn return_loan<S: CatalogStorage>(
    args: ReturnArgs,
    library: &mut Library<S>,
    today: NaiveDate,
) -> AppResult<Response> {
    let outcome = library.return_loan(args.borrower.trim(), today)?;
    let message = if outcome.late {
        format!(
            "Material returned late. Borrower receives 1 strike. Total strikes: {}",
            outcome.violations
        )
    } else {
        "Material returned on time. No strike.".to_string()
    };
    Ok(Response::message(message, json!(outcome)))
}

pub fn history<S: CatalogStorage>(
    command: HistoryCommand,
    library: &Library<S>,
    today: NaiveDate,
) -> AppResult<Response> {
    match command {
        HistoryCommand::Borrower { id } => {
            let entries = library.borrower_history(&id, today)?;
            Ok(list_response(
                entries,
                &format!("No transactions for borrower {}.", id),
            ))
        }
        HistoryCommand::Material { id } => {
            let entries = library.material_history(&id, today)?;
            Ok(list_response(
                entries,
                &format!("No transactions for material {}.", id),
            ))
        }
        HistoryCommand::Transaction { id } => {
            let transaction = library.repository().transactions.get_by_id(&id)?;
            let status = if transaction.returned { "returned" } else { "active" };
            Ok(Response::message(
                format!(
                    "{} | Borrower: {} | Material: {} | Due: {} | {}",
                    transaction.id,
                    transaction.borrower_id,
                    transaction.material_id,
                    transaction.due_date.format("%Y-%m-%d"),
                    status
                ),
                json!(transaction),
            ))
        }
    }
}

pub fn overdue<S: CatalogStorage>(library: &Library<S>, today: NaiveDate) -> Response {
    list_response(library.overdue_loans(today), "No overdue loans.")
}

/// Integrity report. Issues found turn into a non-zero exit status.
pub fn check<S: CatalogStorage>(library: &Library<S>) -> Response {
    let issues = library.check_integrity();
    if issues.is_empty() {
        return Response::message("No inconsistencies found.", json!(issues));
    }

    for issue in &issues {
        tracing::warn!("Integrity: {}", issue);
    }
    let mut lines = vec![format!("{} inconsistency(ies) found:", issues.len())];
    lines.extend(issues.iter().map(|i| format!("- {}", i)));
    Response::new(lines, json!(issues)).with_status(ErrorCode::DataIntegrity as i32)
}

fn list_response(entries: Vec<LoanDetails>, empty: &str) -> Response {
    let lines = if entries.is_empty() {
        vec![empty.to_string()]
    } else {
        entries.iter().map(|e| e.to_string()).collect()
    };
    Response::new(lines, json!(entries))
}
