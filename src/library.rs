//! Library facade: catalog store, services and persistence wired together.
//!
//! Every mutating operation runs against the in-memory store first and,
//! when it succeeds, flushes the collections it touched.

use chrono::NaiveDate;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::{
        borrower::{Borrower, CreateBorrower, UpdateBorrower},
        material::{CreateMaterial, Material, UpdateMaterial},
        transaction::{LoanDetails, ReturnOutcome, Transaction},
    },
    repository::{IntegrityIssue, Repository},
    services::Services,
    storage::{CatalogStorage, FileStorage},
};

/// Collections touched by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dirty {
    Borrowers,
    Materials,
    Transactions,
}

#[derive(Debug)]
pub struct Library<S: CatalogStorage = FileStorage> {
    repository: Repository,
    services: Services,
    storage: S,
}

impl Library<FileStorage> {
    /// Open the library in the configured data directory, creating missing
    /// backing files and loading every collection.
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let storage = FileStorage::new(&config.storage);
        storage.ensure_files()?;
        Self::with_storage(config, storage)
    }
}

impl<S: CatalogStorage> Library<S> {
    /// Build a library on any storage and load its collections
    pub fn with_storage(config: &AppConfig, storage: S) -> AppResult<Self> {
        let mut repository = Repository::new();
        storage.load_all(&mut repository)?;
        Ok(Self {
            repository,
            services: Services::new(config),
            storage,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn flush(&self, dirty: &[Dirty]) -> AppResult<()> {
        for collection in dirty {
            let result = match collection {
                Dirty::Borrowers => self.storage.save_borrowers(&self.repository),
                Dirty::Materials => self.storage.save_materials(&self.repository),
                Dirty::Transactions => self.storage.save_transactions(&self.repository),
            };
            if let Err(e) = result {
                tracing::error!("Failed to save {:?}: {}", collection, e);
                return Err(e);
            }
        }
        Ok(())
    }

    // Borrowers

    pub fn find_borrower(&self, id: &str) -> AppResult<&Borrower> {
        self.repository.find_borrower(id)
    }

    pub fn register_borrower(&mut self, borrower: CreateBorrower) -> AppResult<Borrower> {
        let created = self
            .services
            .catalog
            .register_borrower(&mut self.repository, borrower)?;
        self.flush(&[Dirty::Borrowers])?;
        Ok(created)
    }

    pub fn update_borrower(&mut self, id: &str, update: UpdateBorrower) -> AppResult<Borrower> {
        let updated = self.repository.update_borrower(id, update)?.clone();
        tracing::info!("Updated borrower {}", id);
        self.flush(&[Dirty::Borrowers])?;
        Ok(updated)
    }

    pub fn delete_borrower(&mut self, id: &str) -> AppResult<Borrower> {
        let removed = self.repository.remove_borrower(id)?;
        tracing::info!("Deleted borrower {}", id);
        self.flush(&[Dirty::Borrowers])?;
        Ok(removed)
    }

    /// Administrative reset of a borrower's violations. Returns the previous count.
    pub fn reset_violations(&mut self, id: &str) -> AppResult<u32> {
        let previous = self.repository.reset_violations(id)?;
        tracing::warn!("Violations of borrower {} reset from {} to 0", id, previous);
        self.flush(&[Dirty::Borrowers])?;
        Ok(previous)
    }

    // Materials

    pub fn find_material(&self, id: &str) -> AppResult<&Material> {
        self.repository.find_material(id)
    }

    pub fn add_material(&mut self, material: CreateMaterial) -> AppResult<Material> {
        let created = self
            .services
            .catalog
            .add_material(&mut self.repository, material)?;
        self.flush(&[Dirty::Materials])?;
        Ok(created)
    }

    pub fn update_material(&mut self, id: &str, update: UpdateMaterial) -> AppResult<Material> {
        let updated = self.repository.update_material(id, update)?.clone();
        tracing::info!("Updated material {}", id);
        self.flush(&[Dirty::Materials])?;
        Ok(updated)
    }

    pub fn delete_material(&mut self, id: &str) -> AppResult<Material> {
        let removed = self.repository.remove_material(id)?;
        tracing::info!("Deleted material {}", id);
        self.flush(&[Dirty::Materials])?;
        Ok(removed)
    }

    // Circulation

    pub fn borrow(
        &mut self,
        borrower_id: &str,
        material_id: &str,
        today: NaiveDate,
    ) -> AppResult<Transaction> {
        let transaction =
            self.services
                .loans
                .borrow(&mut self.repository, borrower_id, material_id, today)?;
        self.flush(&[Dirty::Materials, Dirty::Transactions])?;
        Ok(transaction)
    }

    pub fn return_loan(&mut self, borrower_id: &str, today: NaiveDate) -> AppResult<ReturnOutcome> {
        let outcome = self
            .services
            .loans
            .return_loan(&mut self.repository, borrower_id, today)?;
        self.flush(&[Dirty::Borrowers, Dirty::Materials, Dirty::Transactions])?;
        Ok(outcome)
    }

    pub fn borrower_history(&self, borrower_id: &str, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        self.services
            .loans
            .borrower_history(&self.repository, borrower_id, today)
    }

    pub fn material_history(&self, material_id: &str, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        self.services
            .loans
            .material_history(&self.repository, material_id, today)
    }

    pub fn overdue_loans(&self, today: NaiveDate) -> Vec<LoanDetails> {
        self.services.loans.overdue_loans(&self.repository, today)
    }

    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        self.repository.check_integrity()
    }
}
