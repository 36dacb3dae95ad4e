//! Borrower subcommands

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;
use validator::Validate;

use super::{non_blank, Response};
use crate::{
    error::{AppError, AppResult},
    models::borrower::{CreateBorrower, Gender, UpdateBorrower},
    storage::CatalogStorage,
    Library,
};

#[derive(Debug, Subcommand)]
pub enum BorrowerCommand {
    /// Register a borrower
    Add(AddBorrowerArgs),
    /// Edit a borrower; omitted fields keep their value
    Edit(EditBorrowerArgs),
    /// Delete a borrower without active loans
    Delete(BorrowerIdArg),
    /// List all borrowers
    List,
    /// Show one borrower and the active loan, if any
    Show(BorrowerIdArg),
    /// Clear a borrower's violations
    ResetViolations(BorrowerIdArg),
}

#[derive(Debug, Args)]
pub struct BorrowerIdArg {
    /// Borrower ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct AddBorrowerArgs {
    /// Explicit ID; the next sequential ID is used otherwise
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub last_name: String,
    /// M or F
    #[arg(long)]
    pub gender: Gender,
    /// YYYY-MM-DD
    #[arg(long)]
    pub birthday: NaiveDate,
    #[arg(long)]
    pub contact_number: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub address: String,
}

#[derive(Debug, Args)]
pub struct EditBorrowerArgs {
    /// Borrower ID
    pub id: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub gender: Option<Gender>,
    #[arg(long)]
    pub birthday: Option<NaiveDate>,
    #[arg(long)]
    pub contact_number: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl From<AddBorrowerArgs> for CreateBorrower {
    fn from(args: AddBorrowerArgs) -> Self {
        CreateBorrower {
            id: non_blank(args.id),
            first_name: args.first_name,
            middle_name: non_blank(args.middle_name),
            last_name: args.last_name,
            gender: args.gender,
            birthday: args.birthday,
            contact_number: args.contact_number,
            email: args.email,
            address: args.address,
        }
    }
}

impl From<EditBorrowerArgs> for UpdateBorrower {
    fn from(args: EditBorrowerArgs) -> Self {
        UpdateBorrower {
            first_name: args.first_name,
            // An empty middle name clears it
            middle_name: args.middle_name.map(|m| m.trim().to_string()),
            last_name: args.last_name,
            gender: args.gender,
            birthday: args.birthday,
            contact_number: args.contact_number,
            email: args.email,
            address: args.address,
        }
    }
}

pub fn run<S: CatalogStorage>(
    command: BorrowerCommand,
    library: &mut Library<S>,
) -> AppResult<Response> {
    match command {
        BorrowerCommand::Add(args) => {
            let request = CreateBorrower::from(args);
            request.validate()?;
            let borrower = library.register_borrower(request)?;
            Ok(Response::message(
                format!("Borrower added with ID {}.", borrower.id),
                json!(borrower),
            ))
        }
        BorrowerCommand::Edit(args) => {
            let id = args.id.clone();
            let update = UpdateBorrower::from(args);
            if update.is_empty() {
                return Err(AppError::Validation("Nothing to update".to_string()));
            }
            // An empty middle name is allowed; it is not a name to check
            let clears_middle = update.middle_name.as_deref() == Some("");
            let mut checked = update.clone();
            if clears_middle {
                checked.middle_name = None;
            }
            checked.validate()?;

            let borrower = library.update_borrower(&id, update)?;
            Ok(Response::message("Borrower updated.", json!(borrower)))
        }
        BorrowerCommand::Delete(BorrowerIdArg { id }) => {
            let borrower = library.delete_borrower(&id)?;
            Ok(Response::message(
                format!("Borrower {} deleted.", borrower.id),
                json!(borrower),
            ))
        }
        BorrowerCommand::List => {
            let borrowers: Vec<_> = library.repository().borrowers.list().collect();
            let lines = if borrowers.is_empty() {
                vec!["No borrowers registered.".to_string()]
            } else {
                borrowers.iter().map(|b| b.to_string()).collect()
            };
            Ok(Response::new(lines, json!(borrowers)))
        }
        BorrowerCommand::Show(BorrowerIdArg { id }) => {
            let borrower = library.find_borrower(&id)?;
            let active = library.repository().active_loan_for(&id);
            let suspended = library.services().loans.is_suspended(borrower);

            let mut lines = vec![borrower.to_string()];
            if suspended {
                lines.push("Suspended: too many violations.".to_string());
            }
            match active {
                Some(t) => lines.push(format!(
                    "Active loan: {} (due {})",
                    t.material_id,
                    t.due_date.format("%Y-%m-%d")
                )),
                None => lines.push("No active loan.".to_string()),
            }
            Ok(Response::new(
                lines,
                json!({
                    "borrower": borrower,
                    "suspended": suspended,
                    "active_loan": active,
                }),
            ))
        }
        BorrowerCommand::ResetViolations(BorrowerIdArg { id }) => {
            let previous = library.reset_violations(&id)?;
            Ok(Response::message(
                format!("Violations of borrower {} reset (was {}).", id, previous),
                json!({ "id": id, "previous": previous, "violations": 0 }),
            ))
        }
    }
}
