//! Materials collection

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::material::Material,
};

/// Materials keyed by ID, in catalog order
#[derive(Debug, Clone, Default)]
pub struct MaterialsRepository {
    rows: IndexMap<String, Material>,
}

impl MaterialsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get material by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<&Material> {
        self.rows
            .get(id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))
    }

    pub(crate) fn get_by_id_mut(&mut self, id: &str) -> AppResult<&mut Material> {
        self.rows
            .get_mut(id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Find a material with the same title and author
    pub fn find_same_work(&self, title: &str, author: &str) -> Option<&Material> {
        self.rows.values().find(|m| m.same_work(title, author))
    }

    pub(crate) fn insert(&mut self, material: Material) {
        self.rows.insert(material.id.clone(), material);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Material> {
        self.rows.shift_remove(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Material> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace the whole collection; later duplicates of an ID are dropped
    pub(crate) fn replace_all(&mut self, materials: Vec<Material>) {
        self.rows.clear();
        for material in materials {
            if self.rows.contains_key(&material.id) {
                tracing::warn!("Skipping duplicate material id {} in backing store", material.id);
                continue;
            }
            self.insert(material);
        }
    }
}
