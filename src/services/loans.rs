//! Checkout engine: borrow and return of materials

use chrono::NaiveDate;

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        borrower::Borrower,
        transaction::{LoanDetails, ReturnOutcome, Transaction},
    },
    repository::Repository,
    services::policy::LoanPolicy,
};

#[derive(Debug, Clone)]
pub struct LoansService {
    policy: LoanPolicy,
    max_violations: u32,
    allow_multiple_loans: bool,
}

impl LoansService {
    pub fn new(policy: LoanPolicy, config: &CirculationConfig) -> Self {
        Self {
            policy,
            max_violations: config.max_violations,
            allow_multiple_loans: config.allow_multiple_loans,
        }
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Whether the borrower has too many violations to borrow
    pub fn is_suspended(&self, borrower: &Borrower) -> bool {
        borrower.violations >= self.max_violations
    }

    /// Borrow one copy of a material.
    ///
    /// Preconditions are checked in order and the first failure is returned:
    /// borrower exists, borrower not suspended, borrower has no active loan,
    /// material exists, a copy is available. Nothing is mutated unless all pass.
    pub fn borrow(
        &self,
        repository: &mut Repository,
        borrower_id: &str,
        material_id: &str,
        today: NaiveDate,
    ) -> AppResult<Transaction> {
        let borrower = repository.borrowers.get_by_id(borrower_id)?;
        if self.is_suspended(borrower) {
            return Err(AppError::BorrowerSuspended {
                id: borrower.id.clone(),
                violations: borrower.violations,
            });
        }

        if !self.allow_multiple_loans
            && repository.transactions.count_active_for_borrower(borrower_id) > 0
        {
            return Err(AppError::AlreadyHasActiveLoan(borrower_id.to_string()));
        }

        let material = repository.materials.get_by_id(material_id)?;
        if material.available_copies() == 0 {
            return Err(AppError::NoCopiesAvailable(material_id.to_string()));
        }

        let due_date = self.policy.due_date(&material.category, today)?;
        let transaction = Transaction::open(borrower_id, material_id, today, due_date);

        // Both mutations below are infallible once the checks above passed
        repository.materials.get_by_id_mut(material_id)?.checkout_copy();
        repository.transactions.push(transaction.clone());

        tracing::info!(
            "Borrower {} borrowed {} (transaction {}), due {}",
            borrower_id,
            material_id,
            transaction.id,
            due_date
        );

        Ok(transaction)
    }

    /// Return the borrower's active loan (the first one in insertion order).
    ///
    /// A return after the due date adds one violation. The copy is credited
    /// back to the material in the same step.
    pub fn return_loan(
        &self,
        repository: &mut Repository,
        borrower_id: &str,
        today: NaiveDate,
    ) -> AppResult<ReturnOutcome> {
        repository.borrowers.get_by_id(borrower_id)?;

        let index = repository
            .transactions
            .first_active_for_borrower(borrower_id)
            .ok_or_else(|| AppError::NoActiveLoan(borrower_id.to_string()))?;

        let (transaction_id, material_id, late) = {
            let t = repository.transactions.get(index).ok_or_else(|| {
                AppError::DataIntegrity(format!("transaction index {} out of range", index))
            })?;
            (t.id.clone(), t.material_id.clone(), t.is_late_on(today))
        };

        // Verify the material exists before touching anything
        if !repository.materials.contains(&material_id) {
            return Err(AppError::DataIntegrity(format!(
                "transaction {} references missing material {}",
                transaction_id, material_id
            )));
        }

        repository.materials.get_by_id_mut(&material_id)?.return_copy();

        let borrower = repository.borrowers.get_by_id_mut(borrower_id)?;
        if late {
            borrower.violations = borrower.violations.saturating_add(1);
        }
        let violations = borrower.violations;

        let transaction = repository.transactions.get_mut(index).ok_or_else(|| {
            AppError::DataIntegrity(format!("transaction index {} out of range", index))
        })?;
        transaction.close(today);
        let transaction = transaction.clone();

        if late {
            tracing::warn!(
                "Borrower {} returned {} late (due {}, returned {}), violations now {}",
                borrower_id,
                material_id,
                transaction.due_date,
                today,
                violations
            );
        } else {
            tracing::info!("Borrower {} returned {} on time", borrower_id, material_id);
        }

        Ok(ReturnOutcome {
            transaction,
            late,
            violations,
        })
    }

    /// All transactions of a borrower, oldest first. A deleted borrower
    /// still has a history as long as transactions reference it.
    pub fn borrower_history(
        &self,
        repository: &Repository,
        borrower_id: &str,
        today: NaiveDate,
    ) -> AppResult<Vec<LoanDetails>> {
        let history: Vec<LoanDetails> = repository
            .transactions
            .for_borrower(borrower_id)
            .map(|t| details(repository, t, today))
            .collect();

        if history.is_empty() {
            repository.borrowers.get_by_id(borrower_id)?;
        }
        Ok(history)
    }

    /// All transactions of a material, oldest first
    pub fn material_history(
        &self,
        repository: &Repository,
        material_id: &str,
        today: NaiveDate,
    ) -> AppResult<Vec<LoanDetails>> {
        let history: Vec<LoanDetails> = repository
            .transactions
            .for_material(material_id)
            .map(|t| details(repository, t, today))
            .collect();

        if history.is_empty() {
            repository.materials.get_by_id(material_id)?;
        }
        Ok(history)
    }

    /// Active loans past their due date
    pub fn overdue_loans(&self, repository: &Repository, today: NaiveDate) -> Vec<LoanDetails> {
        repository
            .transactions
            .active()
            .filter(|t| t.is_late_on(today))
            .map(|t| details(repository, t, today))
            .collect()
    }
}

/// Join a transaction with display names, falling back to raw IDs
fn details(repository: &Repository, t: &Transaction, today: NaiveDate) -> LoanDetails {
    LoanDetails {
        transaction: t.clone(),
        borrower: repository
            .borrowers
            .get_by_id(&t.borrower_id)
            .map(|b| b.full_name())
            .unwrap_or_else(|_| t.borrower_id.clone()),
        material: repository
            .materials
            .get_by_id(&t.material_id)
            .map(|m| m.display_title())
            .unwrap_or_else(|_| t.material_id.clone()),
        is_overdue: t.is_active() && t.is_late_on(today),
    }
}
