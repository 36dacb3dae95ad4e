//! Persistence of the catalog store, one backing file per collection

pub mod codec;
pub mod files;

pub use files::FileStorage;

use crate::{error::AppResult, repository::Repository};

/// Load and save of each collection. Saving overwrites the backing store
/// with the full collection; loading replaces the in-memory collection.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogStorage {
    /// Create missing backing stores
    fn ensure_files(&self) -> AppResult<()>;

    fn load_borrowers(&self, repository: &mut Repository) -> AppResult<usize>;
    fn load_materials(&self, repository: &mut Repository) -> AppResult<usize>;
    fn load_transactions(&self, repository: &mut Repository) -> AppResult<usize>;

    fn save_borrowers(&self, repository: &Repository) -> AppResult<()>;
    fn save_materials(&self, repository: &Repository) -> AppResult<()>;
    fn save_transactions(&self, repository: &Repository) -> AppResult<()>;

    /// Load every collection
    fn load_all(&self, repository: &mut Repository) -> AppResult<()> {
        let borrowers = self.load_borrowers(repository)?;
        let materials = self.load_materials(repository)?;
        let transactions = self.load_transactions(repository)?;
        tracing::info!(
            "Loaded {} borrowers, {} materials, {} transactions",
            borrowers,
            materials,
            transactions
        );
        Ok(())
    }
}
