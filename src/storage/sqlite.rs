//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ObjectStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ObjectStore, StorageError, StorageResult};
use crate::storage::{ObjectSummary, PutOutcome, StoredObject};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

/// SQLite object store backend
pub struct SqliteObjectStore {
    conn: Connection,
    bucket: String,
}

impl SqliteObjectStore {
    /// Opens (or creates) a store backed by the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `bucket` - Bucket all reads and writes are scoped to
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteObjectStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path, bucket: &str) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            bucket: bucket.to_string(),
        })
    }

    /// Creates an in-memory store (for tests and dry runs)
    pub fn open_in_memory(bucket: &str) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            bucket: bucket.to_string(),
        })
    }

    fn stored_digest(&self, key: &str) -> StorageResult<Option<String>> {
        let digest = self
            .conn
            .query_row(
                "SELECT sha256 FROM objects WHERE bucket = ?1 AND key = ?2",
                params![self.bucket, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(digest)
    }
}

/// Hex-encoded SHA-256 digest of `body`
pub fn body_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

impl ObjectStore for SqliteObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put_object(&mut self, key: &str, body: &[u8]) -> StorageResult<PutOutcome> {
        if key.is_empty() {
            return Err(StorageError::Database("object key cannot be empty".to_string()));
        }

        let digest = body_digest(body);
        let previous = self.stored_digest(key)?;

        if previous.as_deref() == Some(digest.as_str()) {
            return Ok(PutOutcome::Unchanged);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO objects (bucket, key, body, sha256, size, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(bucket, key) DO UPDATE SET
                body = excluded.body,
                sha256 = excluded.sha256,
                size = excluded.size,
                stored_at = excluded.stored_at",
            params![self.bucket, key, body, digest, body.len() as i64, now],
        )?;

        Ok(match previous {
            Some(_) => PutOutcome::Replaced,
            None => PutOutcome::Created,
        })
    }

    fn get_object(&self, key: &str) -> StorageResult<Option<StoredObject>> {
        let object = self
            .conn
            .query_row(
                "SELECT bucket, key, body, sha256, size, stored_at
                 FROM objects WHERE bucket = ?1 AND key = ?2",
                params![self.bucket, key],
                |row| {
                    Ok(StoredObject {
                        bucket: row.get(0)?,
                        key: row.get(1)?,
                        body: row.get(2)?,
                        sha256: row.get(3)?,
                        size: row.get::<_, i64>(4)? as u64,
                        stored_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(object)
    }

    fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, sha256, size, stored_at FROM objects WHERE bucket = ?1 ORDER BY key",
        )?;

        let objects = stmt
            .query_map(params![self.bucket], |row| {
                Ok(ObjectSummary {
                    key: row.get(0)?,
                    sha256: row.get(1)?,
                    size: row.get::<_, i64>(2)? as u64,
                    stored_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(objects)
    }

    fn count_objects(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM objects WHERE bucket = ?1",
            params![self.bucket],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteObjectStore {
        SqliteObjectStore::open_in_memory("test-bucket").unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let mut store = store();
        let outcome = store.put_object("ep1.json", b"[]").unwrap();
        assert_eq!(outcome, PutOutcome::Created);

        let object = store.get_object("ep1.json").unwrap().unwrap();
        assert_eq!(object.bucket, "test-bucket");
        assert_eq!(object.key, "ep1.json");
        assert_eq!(object.body, b"[]");
        assert_eq!(object.size, 2);
        assert_eq!(object.sha256, body_digest(b"[]"));
    }

    #[test]
    fn test_repeated_put_is_idempotent() {
        let mut store = store();
        store.put_object("ep1.json", b"[]").unwrap();
        let outcome = store.put_object("ep1.json", b"[]").unwrap();

        assert_eq!(outcome, PutOutcome::Unchanged);
        assert_eq!(store.count_objects().unwrap(), 1);
    }

    #[test]
    fn test_put_replaces_changed_body() {
        let mut store = store();
        store.put_object("ep1.json", b"[]").unwrap();
        let outcome = store.put_object("ep1.json", b"[1]").unwrap();

        assert_eq!(outcome, PutOutcome::Replaced);
        let object = store.get_object("ep1.json").unwrap().unwrap();
        assert_eq!(object.body, b"[1]");
        assert_eq!(store.count_objects().unwrap(), 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut store = store();
        assert!(matches!(
            store.put_object("", b"[]"),
            Err(StorageError::Database(_))
        ));
    }

    #[test]
    fn test_missing_object() {
        assert!(store().get_object("nope.json").unwrap().is_none());
    }

    #[test]
    fn test_list_objects_sorted() {
        let mut store = store();
        store.put_object("b.json", b"2").unwrap();
        store.put_object("a.json", b"1").unwrap();

        let keys: Vec<String> = store
            .list_objects()
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_buckets_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objects.db");

        let mut first = SqliteObjectStore::new(&path, "first").unwrap();
        first.put_object("ep1.json", b"[]").unwrap();

        let second = SqliteObjectStore::new(&path, "second").unwrap();
        assert_eq!(second.count_objects().unwrap(), 0);
        assert!(second.get_object("ep1.json").unwrap().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objects.db");

        {
            let mut store = SqliteObjectStore::new(&path, "bucket").unwrap();
            store.put_object("ep1.json", b"[]").unwrap();
        }

        let store = SqliteObjectStore::new(&path, "bucket").unwrap();
        assert_eq!(store.count_objects().unwrap(), 1);
    }
}
