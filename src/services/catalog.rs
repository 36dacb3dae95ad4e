//! Catalog management service: registration of borrowers and materials

use crate::{
    config::CirculationConfig,
    error::AppResult,
    models::{
        borrower::{Borrower, CreateBorrower},
        material::{CreateMaterial, Material},
    },
    repository::Repository,
};

#[derive(Debug, Clone)]
pub struct CatalogService {
    borrower_id_base: u64,
}

impl CatalogService {
    pub fn new(config: &CirculationConfig) -> Self {
        Self {
            borrower_id_base: config.borrower_id_base,
        }
    }

    /// Register a borrower, assigning the next sequential ID when none is given
    pub fn register_borrower(
        &self,
        repository: &mut Repository,
        borrower: CreateBorrower,
    ) -> AppResult<Borrower> {
        let id = match borrower.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => repository.next_borrower_id(self.borrower_id_base),
        };

        let created = repository.add_borrower(borrower.into_borrower(id))?.clone();
        tracing::info!("Registered borrower {} ({})", created.id, created.full_name());
        Ok(created)
    }

    /// Add a material to the catalog with no copy on loan
    pub fn add_material(
        &self,
        repository: &mut Repository,
        material: CreateMaterial,
    ) -> AppResult<Material> {
        let created = repository.add_material(material.into_material())?.clone();
        tracing::info!(
            "Cataloged {} {} ({} copies)",
            created.category,
            created.id,
            created.total_copies
        );
        Ok(created)
    }
}
