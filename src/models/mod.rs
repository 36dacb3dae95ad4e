//! Data models for Libdesk

pub mod borrower;
pub mod material;
pub mod transaction;

// Re-export commonly used types
pub use borrower::{Borrower, CreateBorrower, Gender, UpdateBorrower};
pub use material::{CreateMaterial, Material, MaterialCategory, UpdateMaterial};
pub use transaction::{LoanDetails, ReturnOutcome, Transaction};
