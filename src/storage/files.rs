//! Flat-file backing stores

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::{codec, CatalogStorage};
use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{borrower::Borrower, material::Material, transaction::Transaction},
    repository::Repository,
};

/// Backing files under the configured data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    borrowers: PathBuf,
    materials: PathBuf,
    transactions: PathBuf,
    delimiter: u8,
}

impl FileStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            borrowers: config.borrowers_path(),
            materials: config.materials_path(),
            transactions: config.transactions_path(),
            // Config validation guarantees an ASCII delimiter
            delimiter: u8::try_from(config.delimiter).unwrap_or(b'|'),
        }
    }

    fn paths(&self) -> [&Path; 3] {
        [
            self.borrowers.as_path(),
            self.materials.as_path(),
            self.transactions.as_path(),
        ]
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> AppResult<Vec<T>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} does not exist, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        codec::read_records(BufReader::new(file), self.delimiter, &path.display().to_string())
    }

    /// Write to a sibling temporary file, then rename it over the target
    fn write<'a, T, I>(&self, path: &Path, records: I) -> AppResult<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            codec::write_records(&mut writer, self.delimiter, records)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!("Saved {}", path.display());
        Ok(())
    }
}

impl CatalogStorage for FileStorage {
    fn ensure_files(&self) -> AppResult<()> {
        for path in self.paths() {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
            // create_new fails on an existing file, which is left untouched
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(_) => tracing::info!("Created empty backing file {}", path.display()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn load_borrowers(&self, repository: &mut Repository) -> AppResult<usize> {
        let rows: Vec<Borrower> = self.read(&self.borrowers)?;
        repository.borrowers.replace_all(rows);
        Ok(repository.borrowers.len())
    }

    fn load_materials(&self, repository: &mut Repository) -> AppResult<usize> {
        let mut rows: Vec<Material> = self.read(&self.materials)?;
        for m in rows.iter_mut() {
            if m.borrowed_copies > m.total_copies {
                tracing::warn!(
                    "Material {} records {} borrowed of {} copies, clamping",
                    m.id,
                    m.borrowed_copies,
                    m.total_copies
                );
                m.borrowed_copies = m.total_copies;
            }
            if !m.category.is_known() {
                tracing::warn!("Material {} has unknown category {}", m.id, m.category);
            }
        }
        repository.materials.replace_all(rows);
        Ok(repository.materials.len())
    }

    fn load_transactions(&self, repository: &mut Repository) -> AppResult<usize> {
        let rows: Vec<Transaction> = self.read(&self.transactions)?;
        repository.transactions.replace_all(rows);
        Ok(repository.transactions.len())
    }

    fn save_borrowers(&self, repository: &Repository) -> AppResult<()> {
        self.write(&self.borrowers, repository.borrowers.list())
    }

    fn save_materials(&self, repository: &Repository) -> AppResult<()> {
        self.write(&self.materials, repository.materials.list())
    }

    fn save_transactions(&self, repository: &Repository) -> AppResult<()> {
        self.write(&self.transactions, repository.transactions.list())
    }
}
