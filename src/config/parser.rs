use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable overriding `crawler.starting-url`
pub const ENV_STARTING_URL: &str = "TRANSCRIPTS_STARTING_URL";
/// Environment variable overriding `crawler.max-depth`
pub const ENV_MAX_DEPTH: &str = "TRANSCRIPTS_MAX_DEPTH";
/// Environment variable overriding `storage.bucket`
pub const ENV_BUCKET: &str = "TRANSCRIPTS_BUCKET";
/// Environment variable overriding `storage.database-path`
pub const ENV_DATABASE_PATH: &str = "TRANSCRIPTS_DATABASE_PATH";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are not applied here; see [`apply_env_overrides`].
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies environment overrides on top of a loaded configuration
///
/// `lookup` resolves a variable name to its value. The entrypoint passes a
/// closure over `std::env::var`; tests pass a map. The result is validated
/// again since overrides may introduce invalid values.
///
/// # Example
///
/// ```
/// use transcript_crawler::config::{apply_env_overrides, Config};
///
/// let config = apply_env_overrides(Config::default(), |key| match key {
///     "TRANSCRIPTS_BUCKET" => Some("archive".to_string()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(config.storage.bucket, "archive");
/// ```
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_STARTING_URL) {
        config.crawler.starting_url = url;
    }

    if let Some(depth) = lookup(ENV_MAX_DEPTH) {
        config.crawler.max_depth = depth.trim().parse().map_err(|_| {
            ConfigError::Validation(format!("{} must be an integer, got '{}'", ENV_MAX_DEPTH, depth))
        })?;
    }

    if let Some(bucket) = lookup(ENV_BUCKET) {
        config.storage.bucket = bucket;
    }

    if let Some(path) = lookup(ENV_DATABASE_PATH) {
        config.storage.database_path = path;
    }

    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
starting-url = "https://site.com/show"
max-depth = 2
content-selector = ".body"

[fetcher]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[storage]
bucket = "test-bucket"
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.starting_url, "https://site.com/show");
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.content_selector, ".body");
        assert_eq!(config.fetcher.crawler_name, "TestCrawler");
        assert_eq!(config.storage.bucket, "test-bucket");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = create_temp_config("[storage]\nbucket = \"only-bucket\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.storage.bucket, "only-bucket");
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.fetcher.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-depth = 100\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_STARTING_URL, "https://other.com/archive"),
            (ENV_MAX_DEPTH, "1"),
            (ENV_DATABASE_PATH, "/tmp/other.db"),
        ]);

        let config =
            apply_env_overrides(Config::default(), |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.crawler.starting_url, "https://other.com/archive");
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.storage.database_path, "/tmp/other.db");
        assert_eq!(config.storage.bucket, "larry-king-data");
    }

    #[test]
    fn test_env_override_bad_depth() {
        let result = apply_env_overrides(Config::default(), |k| {
            (k == ENV_MAX_DEPTH).then(|| "deep".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_override_is_validated() {
        let result = apply_env_overrides(Config::default(), |k| {
            (k == ENV_STARTING_URL).then(|| "not a url".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }
}
