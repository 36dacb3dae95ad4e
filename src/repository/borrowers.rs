//! Borrowers collection

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::borrower::Borrower,
};

/// Borrowers keyed by ID, in registration order
#[derive(Debug, Clone, Default)]
pub struct BorrowersRepository {
    rows: IndexMap<String, Borrower>,
}

impl BorrowersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get borrower by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<&Borrower> {
        self.rows
            .get(id)
            .ok_or_else(|| AppError::BorrowerNotFound(id.to_string()))
    }

    pub(crate) fn get_by_id_mut(&mut self, id: &str) -> AppResult<&mut Borrower> {
        self.rows
            .get_mut(id)
            .ok_or_else(|| AppError::BorrowerNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Find a registered borrower with the same name and email
    pub fn find_same_identity(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Option<&Borrower> {
        self.rows
            .values()
            .find(|b| b.same_identity(first_name, last_name, email))
    }

    /// Insert without duplicate checks (the store checks before calling)
    pub(crate) fn insert(&mut self, borrower: Borrower) {
        self.rows.insert(borrower.id.clone(), borrower);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Borrower> {
        self.rows.shift_remove(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Borrower> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Next sequential ID: one past the highest numeric ID, never below `base`
    pub fn next_id(&self, base: u64) -> String {
        let next = self
            .rows
            .keys()
            .filter_map(|id| id.parse::<u64>().ok())
            .filter(|id| *id >= base)
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(base);
        next.to_string()
    }

    /// Replace the whole collection; later duplicates of an ID are dropped
    pub(crate) fn replace_all(&mut self, borrowers: Vec<Borrower>) {
        self.rows.clear();
        for borrower in borrowers {
            if self.rows.contains_key(&borrower.id) {
                tracing::warn!("Skipping duplicate borrower id {} in backing store", borrower.id);
                continue;
            }
            self.insert(borrower);
        }
    }
}
