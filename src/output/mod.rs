//! Output module for crawl reports and store listings
//!
//! This module handles:
//! - Printing the outcome of a crawl
//! - Listing stored transcripts
//! - Store statistics

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};

use crate::crawler::{CrawlReport, UploadStatus};
use crate::storage::ObjectStore;
use crate::TranscriptError;

/// Formats a crawl report as human-readable lines
pub fn format_report(report: &CrawlReport) -> Vec<String> {
    let mut lines = vec![format!("Pages fetched: {}", report.pages_fetched)];

    match (&report.selected_link, &report.transcript) {
        (Some(_), Some(transcript)) => {
            lines.push(format!("Transcript: {}", transcript.url));
            lines.push(format!("  Key: {}", transcript.key));
            lines.push(format!("  Turns: {}", transcript.turns));
            lines.push(match &transcript.upload {
                UploadStatus::Stored(outcome) => format!("  Upload: {}", outcome.as_str()),
                UploadStatus::Failed(error) => format!("  Upload failed: {}", error),
            });
        }
        (Some(link), None) => lines.push(format!("Selected link not processed: {}", link)),
        (None, _) => lines.push("No qualifying transcript link found".to_string()),
    }

    if report.depth_exceeded {
        lines.push("Maximum depth exceeded".to_string());
    }

    lines
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Prints every stored object in the bucket to stdout
pub fn print_object_listing(store: &dyn ObjectStore) -> Result<(), TranscriptError> {
    let objects = store.list_objects()?;

    println!("=== {} ({} objects) ===\n", store.bucket(), objects.len());
    for object in &objects {
        println!(
            "{:<60} {:>8} bytes  {}  {}",
            object.key,
            object.size,
            &object.sha256[..object.sha256.len().min(12)],
            object.stored_at
        );
    }

    Ok(())
}
