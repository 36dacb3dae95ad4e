//! Catalog store: in-memory collections of borrowers, materials and transactions

pub mod borrowers;
pub mod materials;
pub mod transactions;

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrower::{Borrower, UpdateBorrower},
        material::{Material, UpdateMaterial},
        transaction::Transaction,
    },
};

/// Inconsistency found by [`Repository::check_integrity`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// An active loan points at a borrower that does not exist
    DanglingBorrower { transaction_id: String, borrower_id: String },
    /// An active loan points at a material that does not exist
    DanglingMaterial { transaction_id: String, material_id: String },
    /// Recorded borrowed copies disagree with the active loans of the material
    CopyCountMismatch { material_id: String, recorded: u32, active: usize },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::DanglingBorrower { transaction_id, borrower_id } => write!(
                f,
                "active transaction {} references missing borrower {}",
                transaction_id, borrower_id
            ),
            IntegrityIssue::DanglingMaterial { transaction_id, material_id } => write!(
                f,
                "active transaction {} references missing material {}",
                transaction_id, material_id
            ),
            IntegrityIssue::CopyCountMismatch { material_id, recorded, active } => write!(
                f,
                "material {} records {} borrowed copies but has {} active loans",
                material_id, recorded, active
            ),
        }
    }
}

/// Owner of the three collections. Transactions refer to borrowers and
/// materials by ID only.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub borrowers: borrowers::BorrowersRepository,
    pub materials: materials::MaterialsRepository,
    pub transactions: transactions::TransactionsRepository,
}

impl Repository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_borrower(&self, id: &str) -> AppResult<&Borrower> {
        self.borrowers.get_by_id(id)
    }

    pub fn find_material(&self, id: &str) -> AppResult<&Material> {
        self.materials.get_by_id(id)
    }

    /// Register a borrower. Rejected when the ID is taken or the same
    /// person (name and email) is already registered.
    pub fn add_borrower(&mut self, borrower: Borrower) -> AppResult<&Borrower> {
        if self.borrowers.contains(&borrower.id) {
            return Err(AppError::DuplicateBorrower(format!(
                "ID {} is already registered",
                borrower.id
            )));
        }
        if let Some(existing) = self.borrowers.find_same_identity(
            &borrower.first_name,
            &borrower.last_name,
            &borrower.email,
        ) {
            return Err(AppError::DuplicateBorrower(format!(
                "{} <{}> is already registered as {}",
                borrower.full_name(),
                borrower.email,
                existing.id
            )));
        }

        let id = borrower.id.clone();
        self.borrowers.insert(borrower);
        self.borrowers.get_by_id(&id)
    }

    /// Add a material. Rejected when the ID is taken or the same title and
    /// author are already cataloged.
    pub fn add_material(&mut self, material: Material) -> AppResult<&Material> {
        if self.materials.contains(&material.id) {
            return Err(AppError::DuplicateMaterial(format!(
                "ID {} is already cataloged",
                material.id
            )));
        }
        if let Some(existing) = self.materials.find_same_work(&material.title, &material.author) {
            return Err(AppError::DuplicateMaterial(format!(
                "\"{}\" is already cataloged as {}",
                material.display_title(),
                existing.id
            )));
        }

        let id = material.id.clone();
        self.materials.insert(material);
        self.materials.get_by_id(&id)
    }

    /// Delete a borrower holding no active loan
    pub fn remove_borrower(&mut self, id: &str) -> AppResult<Borrower> {
        self.borrowers.get_by_id(id)?;
        if self.transactions.count_active_for_borrower(id) > 0 {
            return Err(AppError::HasActiveLoans(format!("Borrower {}", id)));
        }
        self.borrowers
            .remove(id)
            .ok_or_else(|| AppError::BorrowerNotFound(id.to_string()))
    }

    /// Delete a material with no copy on loan
    pub fn remove_material(&mut self, id: &str) -> AppResult<Material> {
        self.materials.get_by_id(id)?;
        if self.transactions.has_active_for_material(id) {
            return Err(AppError::HasActiveLoans(format!("Material {}", id)));
        }
        self.materials
            .remove(id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))
    }

    /// Edit borrower fields. The violation counter is left alone.
    pub fn update_borrower(&mut self, id: &str, update: UpdateBorrower) -> AppResult<&Borrower> {
        let mut edited = self.borrowers.get_by_id(id)?.clone();
        update.apply(&mut edited);

        let clash = self
            .borrowers
            .list()
            .find(|b| b.id != id && b.same_identity(&edited.first_name, &edited.last_name, &edited.email));
        if let Some(other) = clash {
            return Err(AppError::DuplicateBorrower(format!(
                "{} <{}> is already registered as {}",
                edited.full_name(),
                edited.email,
                other.id
            )));
        }

        let borrower = self.borrowers.get_by_id_mut(id)?;
        *borrower = edited;
        Ok(&*borrower)
    }

    /// Edit material fields. Total copies cannot drop below the copies on loan.
    pub fn update_material(&mut self, id: &str, update: UpdateMaterial) -> AppResult<&Material> {
        let mut edited = self.materials.get_by_id(id)?.clone();
        if let Some(title) = update.title {
            edited.title = title.trim().to_string();
        }
        if let Some(author) = update.author {
            edited.author = author.trim().to_string();
        }
        if let Some(year) = update.year_published {
            edited.year_published = year;
        }
        if let Some(total) = update.total_copies {
            if total < edited.borrowed_copies {
                return Err(AppError::Validation(format!(
                    "total copies ({}) cannot be lower than copies on loan ({})",
                    total, edited.borrowed_copies
                )));
            }
            edited.total_copies = total;
        }

        let clash = self
            .materials
            .list()
            .find(|m| m.id != id && m.same_work(&edited.title, &edited.author));
        if let Some(other) = clash {
            return Err(AppError::DuplicateMaterial(format!(
                "\"{}\" is already cataloged as {}",
                edited.display_title(),
                other.id
            )));
        }

        let material = self.materials.get_by_id_mut(id)?;
        *material = edited;
        Ok(&*material)
    }

    /// Administrative reset of a borrower's violations. Returns the previous count.
    pub fn reset_violations(&mut self, id: &str) -> AppResult<u32> {
        let borrower = self.borrowers.get_by_id_mut(id)?;
        let previous = borrower.violations;
        borrower.violations = 0;
        Ok(previous)
    }

    /// Next sequential borrower ID at or above `base`
    pub fn next_borrower_id(&self, base: u64) -> String {
        self.borrowers.next_id(base)
    }

    /// First active loan of a borrower, in insertion order
    pub fn active_loan_for(&self, borrower_id: &str) -> Option<&Transaction> {
        self.transactions
            .first_active_for_borrower(borrower_id)
            .and_then(|index| self.transactions.get(index))
    }

    /// Report dangling references of active loans and copy counters that
    /// disagree with them. Nothing is corrected.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for t in self.transactions.active() {
            if !self.borrowers.contains(&t.borrower_id) {
                issues.push(IntegrityIssue::DanglingBorrower {
                    transaction_id: t.id.clone(),
                    borrower_id: t.borrower_id.clone(),
                });
            }
            if !self.materials.contains(&t.material_id) {
                issues.push(IntegrityIssue::DanglingMaterial {
                    transaction_id: t.id.clone(),
                    material_id: t.material_id.clone(),
                });
            }
        }

        for m in self.materials.list() {
            let active = self.transactions.count_active_for_material(&m.id);
            if active != m.borrowed_copies as usize {
                issues.push(IntegrityIssue::CopyCountMismatch {
                    material_id: m.id.clone(),
                    recorded: m.borrowed_copies,
                    active,
                });
            }
        }

        issues
    }
}
