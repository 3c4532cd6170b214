use serde::Deserialize;

/// Default transcript archive index
pub const DEFAULT_STARTING_URL: &str = "https://transcripts.cnn.com/show/lkl";

/// Default maximum traversal depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default CSS selector for the transcript body
pub const DEFAULT_CONTENT_SELECTOR: &str = ".cnnBodyText";

/// Default bucket transcripts are stored under
pub const DEFAULT_BUCKET: &str = "larry-king-data";

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; only links under this prefix are followed
    #[serde(rename = "starting-url")]
    pub starting_url: String,

    /// Maximum depth to crawl from the starting URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// CSS selector matching the transcript body elements
    #[serde(rename = "content-selector")]
    pub content_selector: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            starting_url: DEFAULT_STARTING_URL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Name of the crawler, used in the user agent
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler, used in the user agent
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            crawler_name: "TranscriptCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FetcherConfig {
    /// Formats the user agent string: `Name/Version (+ContactURL)`
    pub fn user_agent(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket transcripts are written to
    pub bucket: String,

    /// Path to the SQLite database backing the object store
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            database_path: "./transcripts.db".to_string(),
        }
    }
}
