//! Business logic services

pub mod catalog;
pub mod loans;
pub mod policy;

use crate::config::AppConfig;

/// Container for all services
#[derive(Debug, Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services from the configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(&config.circulation),
            loans: loans::LoansService::new(
                policy::LoanPolicy::new(&config.loan_policy),
                &config.circulation,
            ),
        }
    }
}
