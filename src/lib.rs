//! Transcript crawler
//!
//! This crate crawls a transcript archive site, extracts the dialogue from a
//! transcript page, normalizes it into speaker turns and persists it under a
//! key derived from the page URL.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod transcript;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation failed: {0}")]
    Navigation(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, HttpFetcher, PageFetcher};
pub use storage::{ObjectStore, SqliteObjectStore};
pub use transcript::{parse_transcript, SpeakerTurn};
pub use crate::url::derive_key;
