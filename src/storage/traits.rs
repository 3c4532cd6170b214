//! Storage traits and error types
//!
//! This module defines the trait interface for object storage backends and
//! associated error types.

use crate::storage::{ObjectSummary, PutOutcome, StoredObject};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value object storage scoped to a single bucket
///
/// Writes are idempotent: putting the same body under the same key twice
/// leaves the store unchanged.
pub trait ObjectStore {
    /// Name of the bucket objects are written to
    fn bucket(&self) -> &str;

    /// Stores `body` under `key`, replacing any previous body
    fn put_object(&mut self, key: &str, body: &[u8]) -> StorageResult<PutOutcome>;

    /// Loads the object stored under `key`
    fn get_object(&self, key: &str) -> StorageResult<Option<StoredObject>>;

    /// Lists every object in the bucket, ordered by key
    fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>>;

    /// Counts the objects in the bucket
    fn count_objects(&self) -> StorageResult<u64>;
}
