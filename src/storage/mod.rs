//! Object storage for parsed transcripts
//!
//! Transcripts are written as JSON bodies under keys derived from their page
//! URL. This module handles:
//! - The object store trait seam
//! - A SQLite-backed store with idempotent writes
//! - Object records and write outcomes

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{body_digest, SqliteObjectStore};
pub use traits::{ObjectStore, StorageError, StorageResult};

use crate::config::StorageConfig;
use std::path::Path;

/// Opens the object store described by the configuration
///
/// # Arguments
///
/// * `config` - The storage configuration
///
/// # Returns
///
/// * `Ok(SqliteObjectStore)` - Successfully opened store
/// * `Err(StorageError)` - Failed to open the database
pub fn open_store(config: &StorageConfig) -> StorageResult<SqliteObjectStore> {
    SqliteObjectStore::new(Path::new(&config.database_path), &config.bucket)
}

/// A stored object with its body
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub sha256: String,
    pub size: u64,
    pub stored_at: String,
}

/// Object metadata without the body
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub sha256: String,
    pub size: u64,
    pub stored_at: String,
}

/// Result of a `put_object` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// No object existed under the key
    Created,
    /// An object with a different body was overwritten
    Replaced,
    /// An identical body was already stored
    Unchanged,
}

impl PutOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Replaced => "replaced",
            Self::Unchanged => "unchanged",
        }
    }
}
