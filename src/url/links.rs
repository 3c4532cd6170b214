use url::Url;

/// Resolves an `href` against the crawl's base URL
///
/// Relative links resolve against the site root, not the page they were found
/// on. Returns `None` when the href cannot be turned into an absolute URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    match base_url.join(href.trim()) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            tracing::debug!("Skipping unresolvable href {:?}: {}", href, e);
            None
        }
    }
}

/// Returns true if `link` is worth following from `current_url`
///
/// A qualifying link starts with the starting URL (plain string prefix) and
/// is not the page currently being visited.
pub fn is_qualifying_link(link: &str, starting_url: &str, current_url: &str) -> bool {
    link.starts_with(starting_url) && link != current_url
}

/// Resolves `hrefs` in document order and returns the first qualifying link
pub fn first_qualifying_link<'a, I>(
    hrefs: I,
    base_url: &Url,
    starting_url: &str,
    current_url: &str,
) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .filter_map(|href| resolve_link(href, base_url))
        .find(|link| is_qualifying_link(link, starting_url, current_url))
}
