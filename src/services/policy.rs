//! Loan policy: how many days each category of material may be kept

use chrono::{Duration, NaiveDate};

use crate::{
    config::LoanPolicyConfig,
    error::{AppError, AppResult},
    models::material::MaterialCategory,
};

/// Category to loan-days table. Queried at borrow time only, so a later
/// category correction never changes the due date of past loans.
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    book: u32,
    journal: u32,
    magazine: u32,
    thesis: u32,
    fallback: u32,
}

impl LoanPolicy {
    pub fn new(config: &LoanPolicyConfig) -> Self {
        Self {
            book: config.book,
            journal: config.journal,
            magazine: config.magazine,
            thesis: config.thesis,
            fallback: config.fallback,
        }
    }

    /// Loan duration in days for a category
    pub fn loan_days(&self, category: &MaterialCategory) -> u32 {
        match category {
            MaterialCategory::Book => self.book,
            MaterialCategory::Journal => self.journal,
            MaterialCategory::Magazine => self.magazine,
            MaterialCategory::Thesis => self.thesis,
            MaterialCategory::Other(tag) => {
                tracing::warn!(
                    "Unknown material category {:?}, using fallback loan duration of {} days",
                    tag,
                    self.fallback
                );
                self.fallback
            }
        }
    }

    /// Due date of a loan of `category` starting on `borrow_date`.
    /// Fails when the date falls outside the calendar range.
    pub fn due_date(&self, category: &MaterialCategory, borrow_date: NaiveDate) -> AppResult<NaiveDate> {
        let days = self.loan_days(category);
        borrow_date
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Due date of a {}-day loan from {} is out of range",
                    days, borrow_date
                ))
            })
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::new(&LoanPolicyConfig::default())
    }
}
