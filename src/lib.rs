//! Libdesk Library Catalog
//!
//! A single-user library catalog: borrowers, circulating materials and the
//! borrow/return lifecycle, persisted as delimited text files between runs.

pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use library::Library;
