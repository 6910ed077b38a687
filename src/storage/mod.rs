//! Storage module for database and configuration.

pub mod classification_store;
pub mod config;
pub mod database;
pub mod ftp_store;
pub mod schema;

pub use classification_store::{ClassificationStore, StoredClassification};
pub use config::{AppConfig, BatchSettings, ConfigError};
pub use database::{Database, DatabaseError};
pub use ftp_store::FtpHistoryStore;
