//! Error types for Libdesk

use thiserror::Error;

/// Error kinds reported to the command dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotFound = 2,
    DuplicateEntity = 3,
    HasActiveLoans = 4,
    BorrowerSuspended = 5,
    AlreadyHasActiveLoan = 6,
    NoCopiesAvailable = 7,
    NoActiveLoan = 8,
    DataIntegrity = 9,
    BadValue = 10,
    StorageFailure = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Borrower {0} not found")]
    BorrowerNotFound(String),

    #[error("Material {0} not found")]
    MaterialNotFound(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    #[error("Duplicate borrower: {0}")]
    DuplicateBorrower(String),

    #[error("Duplicate material: {0}")]
    DuplicateMaterial(String),

    #[error("{0} still has active loans")]
    HasActiveLoans(String),

    #[error("Borrower {id} is suspended ({violations} violations)")]
    BorrowerSuspended { id: String, violations: u32 },

    #[error("Borrower {0} already has an active loan")]
    AlreadyHasActiveLoan(String),

    #[error("No copies of material {0} are available")]
    NoCopiesAvailable(String),

    #[error("Borrower {0} has no active loan")]
    NoActiveLoan(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Error kind of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::BorrowerNotFound(_)
            | AppError::MaterialNotFound(_)
            | AppError::TransactionNotFound(_) => ErrorCode::NotFound,
            AppError::DuplicateBorrower(_) | AppError::DuplicateMaterial(_) => {
                ErrorCode::DuplicateEntity
            }
            AppError::HasActiveLoans(_) => ErrorCode::HasActiveLoans,
            AppError::BorrowerSuspended { .. } => ErrorCode::BorrowerSuspended,
            AppError::AlreadyHasActiveLoan(_) => ErrorCode::AlreadyHasActiveLoan,
            AppError::NoCopiesAvailable(_) => ErrorCode::NoCopiesAvailable,
            AppError::NoActiveLoan(_) => ErrorCode::NoActiveLoan,
            AppError::DataIntegrity(_) => ErrorCode::DataIntegrity,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Storage(_) | AppError::Csv(_) => ErrorCode::StorageFailure,
            AppError::Config(_) => ErrorCode::Failure,
        }
    }

    /// Process exit status for the command line
    pub fn exit_code(&self) -> i32 {
        self.code() as i32
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
