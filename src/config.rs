//! Configuration management for Libdesk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub borrowers_file: String,
    pub materials_file: String,
    pub transactions_file: String,
    /// Single ASCII character separating fields in the backing files
    pub delimiter: char,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CirculationConfig {
    /// Number of violations at which a borrower is suspended
    pub max_violations: u32,
    /// First ID handed out to a registered borrower
    pub borrower_id_base: u64,
    /// Relaxes the one-active-loan-per-borrower rule
    pub allow_multiple_loans: bool,
}

/// Loan duration in days per material category
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoanPolicyConfig {
    pub book: u32,
    pub journal: u32,
    pub magazine: u32,
    pub thesis: u32,
    /// Used for categories the catalog does not recognize
    pub fallback: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// When set, logs are also written to `libdesk.log` in this directory
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub circulation: CirculationConfig,
    #[serde(default)]
    pub loan_policy: LoanPolicyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Add environment variables (LIBDESK__STORAGE__DATA_DIR=...)
            .add_source(
                Environment::with_prefix("LIBDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let d = self.storage.delimiter;
        if !d.is_ascii() || d == '"' || d == '\n' || d == '\r' {
            return Err(ConfigError::Message(format!(
                "storage.delimiter must be a single ASCII character other than quote or newline, got {:?}",
                d
            )));
        }
        if self.circulation.max_violations == 0 {
            return Err(ConfigError::Message(
                "circulation.max_violations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn borrowers_path(&self) -> PathBuf {
        self.data_dir.join(&self.borrowers_file)
    }

    pub fn materials_path(&self) -> PathBuf {
        self.data_dir.join(&self.materials_file)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.transactions_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            borrowers_file: "borrowers.txt".to_string(),
            materials_file: "materials.txt".to_string(),
            transactions_file: "transactions.txt".to_string(),
            delimiter: '|',
        }
    }
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            max_violations: 3,
            borrower_id_base: 2025000,
            allow_multiple_loans: false,
        }
    }
}

impl Default for LoanPolicyConfig {
    fn default() -> Self {
        Self {
            book: 7,
            journal: 3,
            magazine: 0,
            thesis: 2,
            fallback: 7,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
