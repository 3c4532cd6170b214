use crate::{UrlError, UrlResult};
use url::form_urlencoded;
use url::Url;

/// Derives the object storage key for a transcript page
///
/// The key is the page path relative to the starting URL with surrounding
/// slashes trimmed, followed by `_<query>` when the page has a query string,
/// and a `.json` extension. The starting URL is removed from `url` as
/// written, as a plain string rather than by path segments, before the
/// remainder is cut at its first `?` or `#`.
///
/// # Arguments
///
/// * `url` - The transcript page URL
/// * `starting_url` - The URL the crawl started from
///
/// # Returns
///
/// * `Ok(String)` - The storage key
/// * `Err(UrlError)` - `url` could not be parsed
///
/// # Examples
///
/// ```
/// use transcript_crawler::url::derive_key;
///
/// let key = derive_key("https://site.com/show/ep1?tab=full", "https://site.com/show").unwrap();
/// assert_eq!(key, "ep1_tab=full.json");
/// ```
pub fn derive_key(url: &str, starting_url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    let ending = match url.strip_prefix(starting_url) {
        Some(rest) => rest.to_string(),
        None => url.replacen(starting_url, "", 1),
    };
    let path_end = ending.find(['?', '#']).unwrap_or(ending.len());
    let path_segment = ending[..path_end].trim_matches('/');

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(parsed.query_pairs())
        .finish();
    let query_segment = if query.is_empty() {
        String::new()
    } else {
        format!("_{}", query)
    };

    Ok(format!("{}{}.json", path_segment, query_segment))
}
