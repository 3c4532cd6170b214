//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering environment overrides on top of them.
//!
//! # Example
//!
//! ```no_run
//! use transcript_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, StorageConfig, DEFAULT_BUCKET, DEFAULT_CONTENT_SELECTOR,
    DEFAULT_MAX_DEPTH, DEFAULT_STARTING_URL,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash, ENV_BUCKET,
    ENV_DATABASE_PATH, ENV_MAX_DEPTH, ENV_STARTING_URL,
};
pub use validation::{validate, MAX_DEPTH_LIMIT};
