//! Borrow/return transaction model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One borrow of one copy. Open until returned, then closed for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub borrower_id: String,
    pub material_id: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned: bool,
    pub return_date: Option<NaiveDate>,
}

impl Transaction {
    /// Open a new loan with a fresh ID
    pub fn open(
        borrower_id: &str,
        material_id: &str,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            borrower_id: borrower_id.to_string(),
            material_id: material_id.to_string(),
            borrow_date,
            due_date,
            returned: false,
            return_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.returned
    }

    /// Late when returned (or checked) on a calendar day after the due date
    pub fn is_late_on(&self, day: NaiveDate) -> bool {
        day > self.due_date
    }

    pub fn close(&mut self, day: NaiveDate) {
        self.returned = true;
        self.return_date = Some(day);
    }
}

/// Outcome of a successful return
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOutcome {
    pub transaction: Transaction,
    pub late: bool,
    /// Borrower's violation count after the return
    pub violations: u32,
}

/// Transaction with display names for history views
#[derive(Debug, Clone, Serialize)]
pub struct LoanDetails {
    pub transaction: Transaction,
    /// Borrower full name, or the raw ID when the borrower no longer exists
    pub borrower: String,
    /// Material display title, or the raw ID when the material no longer exists
    pub material: String,
    pub is_overdue: bool,
}

impl std::fmt::Display for LoanDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = &self.transaction;
        write!(
            f,
            "Borrower: {} | Material: {} | Borrowed: {} | Due: {} | Returned: {} | ReturnedDate: {}",
            self.borrower,
            self.material,
            t.borrow_date.format("%Y-%m-%d"),
            t.due_date.format("%Y-%m-%d"),
            if t.returned { "Yes" } else { "No" },
            t.return_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        )?;
        if self.is_overdue {
            write!(f, " | OVERDUE")?;
        }
        Ok(())
    }
}
