//! URL handling module
//!
//! This module resolves discovered links against the crawl's base URL,
//! decides which links qualify for a visit, and derives storage keys.

mod key;
mod links;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use key::derive_key;
pub use links::{first_qualifying_link, is_qualifying_link, resolve_link};

/// Computes the base URL (scheme, host and explicit port) of a starting URL
///
/// Discovered hrefs are resolved against this base rather than against the
/// page they were found on.
///
/// # Examples
///
/// ```
/// use transcript_crawler::url::base_url;
///
/// let base = base_url("https://site.com/show/lkl").unwrap();
/// assert_eq!(base.as_str(), "https://site.com/");
/// ```
pub fn base_url(starting_url: &str) -> UrlResult<Url> {
    let url = Url::parse(starting_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(starting_url.to_string()));
    }

    Url::parse(&url.origin().ascii_serialization()).map_err(|e| UrlError::Parse(e.to_string()))
}
