//! Shared fixtures for integration tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use libdesk::{
    config::AppConfig,
    models::{CreateBorrower, CreateMaterial, Gender, MaterialCategory},
    repository::Repository,
    storage::{codec, CatalogStorage},
    AppResult,
};

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + chrono::Duration::days(offset)
}

/// Configuration pointing at a fresh directory under the system temp dir
pub fn temp_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_dir = temp_dir();
    config
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("libdesk-it-{}", uuid::Uuid::new_v4()))
}

pub fn borrower(first_name: &str, last_name: &str) -> CreateBorrower {
    CreateBorrower {
        id: None,
        first_name: first_name.to_string(),
        middle_name: None,
        last_name: last_name.to_string(),
        gender: Gender::Female,
        birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        contact_number: "09171234567".to_string(),
        email: format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        address: "12 Mabini St., Quezon City".to_string(),
    }
}

pub fn material(id: &str, category: MaterialCategory, copies: u32) -> CreateMaterial {
    CreateMaterial {
        id: id.to_string(),
        category,
        title: format!("Title of {}", id),
        author: Some("Some Author".to_string()),
        year_published: 2001,
        total_copies: copies,
    }
}

/// Storage starting empty that keeps the last saved text of each collection
#[derive(Debug, Default)]
pub struct RecordingStorage {
    files: RefCell<HashMap<&'static str, String>>,
}

impl RecordingStorage {
    pub fn text(&self, name: &'static str) -> String {
        self.files.borrow().get(name).cloned().unwrap_or_default()
    }

    fn record<'a, T, I>(&self, name: &'static str, records: I) -> AppResult<()>
    where
        T: serde::Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut buf = Vec::new();
        codec::write_records(&mut buf, b'|', records)?;
        self.files
            .borrow_mut()
            .insert(name, String::from_utf8(buf).unwrap());
        Ok(())
    }
}

impl CatalogStorage for RecordingStorage {
    fn ensure_files(&self) -> AppResult<()> {
        Ok(())
    }

    fn load_borrowers(&self, _repository: &mut Repository) -> AppResult<usize> {
        Ok(0)
    }

    fn load_materials(&self, _repository: &mut Repository) -> AppResult<usize> {
        Ok(0)
    }

    fn load_transactions(&self, _repository: &mut Repository) -> AppResult<usize> {
        Ok(0)
    }

    fn save_borrowers(&self, repository: &Repository) -> AppResult<()> {
        self.record("borrowers", repository.borrowers.list())
    }

    fn save_materials(&self, repository: &Repository) -> AppResult<()> {
        self.record("materials", repository.materials.list())
    }

    fn save_transactions(&self, repository: &Repository) -> AppResult<()> {
        self.record("transactions", repository.transactions.list())
    }
}
