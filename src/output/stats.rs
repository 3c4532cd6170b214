//! Statistics generation from the object store
//!
//! This module provides functionality for extracting and displaying
//! statistics about stored transcripts.

use crate::storage::{ObjectStore, ObjectSummary};
use crate::TranscriptError;

/// Object store statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Bucket the statistics were collected from
    pub bucket: String,

    /// Number of stored transcripts
    pub object_count: u64,

    /// Total size of all stored bodies in bytes
    pub total_bytes: u64,

    /// Timestamp of the oldest write
    pub oldest: Option<String>,

    /// Timestamp of the newest write
    pub newest: Option<String>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The object store to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(TranscriptError)` - Failed to query the store
pub fn load_statistics(store: &dyn ObjectStore) -> Result<StoreStatistics, TranscriptError> {
    let objects = store.list_objects()?;
    Ok(summarize(store.bucket(), &objects))
}

fn summarize(bucket: &str, objects: &[ObjectSummary]) -> StoreStatistics {
    // RFC 3339 timestamps in UTC sort lexicographically
    let oldest = objects.iter().map(|o| &o.stored_at).min().cloned();
    let newest = objects.iter().map(|o| &o.stored_at).max().cloned();

    StoreStatistics {
        bucket: bucket.to_string(),
        object_count: objects.len() as u64,
        total_bytes: objects.iter().map(|o| o.size).sum(),
        oldest,
        newest,
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Transcript Store Statistics ===\n");
    println!("Bucket: {}", stats.bucket);
    println!("Transcripts stored: {}", stats.object_count);
    println!("Total size: {} bytes", stats.total_bytes);

    if let (Some(oldest), Some(newest)) = (&stats.oldest, &stats.newest) {
        println!("Oldest write: {}", oldest);
        println!("Newest write: {}", newest);
    }
}
