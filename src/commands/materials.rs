//! Material subcommands

use clap::{Args, Subcommand};
use serde_json::json;
use validator::Validate;

use super::{non_blank, Response};
use crate::{
    error::{AppError, AppResult},
    models::material::{CreateMaterial, MaterialCategory, UpdateMaterial},
    storage::CatalogStorage,
    Library,
};

#[derive(Debug, Subcommand)]
pub enum MaterialCommand {
    /// Add a material to the catalog
    Add(AddMaterialArgs),
    /// Edit a material; omitted fields keep their value
    Edit(EditMaterialArgs),
    /// Delete a material without active loans
    Delete(MaterialIdArg),
    /// List all materials
    List,
    /// Show one material
    Show(MaterialIdArg),
}

#[derive(Debug, Args)]
pub struct MaterialIdArg {
    /// Material ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct AddMaterialArgs {
    #[arg(long)]
    pub id: String,
    /// book, journal, magazine or thesis
    #[arg(long, value_parser = str::parse::<MaterialCategory>)]
    pub category: MaterialCategory,
    #[arg(long)]
    pub title: String,
    /// Author or publisher
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long = "year")]
    pub year_published: i32,
    #[arg(long = "copies")]
    pub total_copies: u32,
}

#[derive(Debug, Args)]
pub struct EditMaterialArgs {
    /// Material ID
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long = "year")]
    pub year_published: Option<i32>,
    #[arg(long = "copies")]
    pub total_copies: Option<u32>,
}

impl From<AddMaterialArgs> for CreateMaterial {
    fn from(args: AddMaterialArgs) -> Self {
        CreateMaterial {
            id: args.id.trim().to_string(),
            category: args.category,
            title: args.title.trim().to_string(),
            author: non_blank(args.author),
            year_published: args.year_published,
            total_copies: args.total_copies,
        }
    }
}

impl From<EditMaterialArgs> for UpdateMaterial {
    fn from(args: EditMaterialArgs) -> Self {
        UpdateMaterial {
            title: args.title.map(|t| t.trim().to_string()),
            author: args.author.map(|a| a.trim().to_string()),
            year_published: args.year_published,
            total_copies: args.total_copies,
        }
    }
}

pub fn run<S: CatalogStorage>(
    command: MaterialCommand,
    library: &mut Library<S>,
) -> AppResult<Response> {
    match command {
        MaterialCommand::Add(args) => {
            let request = CreateMaterial::from(args);
            request.validate()?;
            let material = library.add_material(request)?;
            Ok(Response::message(
                format!("Material {} added.", material.id),
                json!(material),
            ))
        }
        MaterialCommand::Edit(args) => {
            let id = args.id.clone();
            let update = UpdateMaterial::from(args);
            if update.is_empty() {
                return Err(AppError::Validation("Nothing to update".to_string()));
            }
            update.validate()?;
            let material = library.update_material(&id, update)?;
            Ok(Response::message("Material updated.", json!(material)))
        }
        MaterialCommand::Delete(MaterialIdArg { id }) => {
            let material = library.delete_material(&id)?;
            Ok(Response::message(
                format!("Material {} deleted.", material.id),
                json!(material),
            ))
        }
        MaterialCommand::List => {
            let materials: Vec<_> = library.repository().materials.list().collect();
            let lines = if materials.is_empty() {
                vec!["No materials.".to_string()]
            } else {
                materials.iter().map(|m| m.to_string()).collect()
            };
            Ok(Response::new(lines, json!(materials)))
        }
        MaterialCommand::Show(MaterialIdArg { id }) => {
            let material = library.find_material(&id)?;
            let loan_days = library.services().loans.policy().loan_days(&material.category);
            let lines = vec![
                material.to_string(),
                format!("Loan period: {} day(s)", loan_days),
            ];
            Ok(Response::new(
                lines,
                json!({
                    "material": material,
                    "available_copies": material.available_copies(),
                    "loan_days": loan_days,
                }),
            ))
        }
    }
}
