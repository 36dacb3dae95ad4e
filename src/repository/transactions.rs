//! Transactions collection

use crate::{
    error::{AppError, AppResult},
    models::transaction::Transaction,
};

/// Transactions in insertion order. Order decides which active loan a
/// return closes when a borrower holds several.
#[derive(Debug, Clone, Default)]
pub struct TransactionsRepository {
    rows: Vec<Transaction>,
}

impl TransactionsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get transaction by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<&Transaction> {
        self.rows
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Position of the first active loan of a borrower
    pub fn first_active_for_borrower(&self, borrower_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|t| t.is_active() && t.borrower_id == borrower_id)
    }

    pub fn count_active_for_borrower(&self, borrower_id: &str) -> usize {
        self.rows
            .iter()
            .filter(|t| t.is_active() && t.borrower_id == borrower_id)
            .count()
    }

    pub fn has_active_for_material(&self, material_id: &str) -> bool {
        self.rows
            .iter()
            .any(|t| t.is_active() && t.material_id == material_id)
    }

    pub fn count_active_for_material(&self, material_id: &str) -> usize {
        self.rows
            .iter()
            .filter(|t| t.is_active() && t.material_id == material_id)
            .count()
    }

    pub fn for_borrower<'a>(&'a self, borrower_id: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.rows.iter().filter(move |t| t.borrower_id == borrower_id)
    }

    pub fn for_material<'a>(&'a self, material_id: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.rows.iter().filter(move |t| t.material_id == material_id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Transaction> {
        self.rows.iter().filter(|t| t.is_active())
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.rows.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Transaction> {
        self.rows.get_mut(index)
    }

    pub(crate) fn push(&mut self, transaction: Transaction) {
        self.rows.push(transaction);
    }

    pub fn list(&self) -> impl Iterator<Item = &Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn replace_all(&mut self, transactions: Vec<Transaction>) {
        self.rows = transactions;
    }
}
