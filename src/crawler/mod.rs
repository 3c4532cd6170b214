//! Crawler module for page fetching and transcript processing
//!
//! This module contains the core crawling logic, including:
//! - The fetch session trait and its HTTP implementation
//! - HTML extraction of links and transcript bodies
//! - The depth-bounded traversal that ties them together

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{
    Coordinator, CrawlReport, CrawlState, StoredTranscript, UploadStatus,
};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use parser::PageExtractor;

use crate::config::Config;
use crate::storage::open_store;
use crate::TranscriptError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the object store
/// 2. Open an HTTP fetch session
/// 3. Visit the starting URL and its first qualifying link
/// 4. Store the parsed transcript
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(TranscriptError)` - Setup failed or a page could not be loaded
pub async fn crawl(config: &Config) -> Result<CrawlReport, TranscriptError> {
    let store = open_store(&config.storage)?;
    let session = HttpFetcher::new(&config.fetcher)?;

    let mut coordinator = Coordinator::new(&config.crawler, store)?;
    coordinator.crawl(session).await
}
