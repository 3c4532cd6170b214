//! HTML extraction for fetched pages
//!
//! This module pulls two things out of a document:
//! - the raw `href` of every anchor, for link discovery
//! - the transcript body, for transcript pages

use crate::transcript::LINE_BREAK;
use crate::ConfigError;
use scraper::{Html, Selector};

/// Extracts links and transcript content from page markup
#[derive(Debug, Clone)]
pub struct PageExtractor {
    anchors: Selector,
    content: Selector,
}

impl PageExtractor {
    /// Compiles the selectors used for extraction
    ///
    /// # Arguments
    ///
    /// * `content_selector` - CSS selector matching transcript body elements
    ///
    /// # Returns
    ///
    /// * `Ok(PageExtractor)` - Selectors compiled
    /// * `Err(ConfigError)` - `content_selector` is not a valid selector
    pub fn new(content_selector: &str) -> Result<Self, ConfigError> {
        let anchors = Selector::parse("a[href]")
            .map_err(|e| ConfigError::InvalidSelector(format!("a[href]: {:?}", e)))?;
        let content = Selector::parse(content_selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("'{}': {:?}", content_selector, e))
        })?;

        Ok(Self { anchors, content })
    }

    /// Returns every anchor `href` value in document order
    ///
    /// Values are returned as written; resolution happens in the traversal.
    ///
    /// # Example
    ///
    /// ```
    /// use transcript_crawler::crawler::PageExtractor;
    ///
    /// let extractor = PageExtractor::new(".cnnBodyText").unwrap();
    /// let hrefs = extractor.extract_hrefs(r#"<a href="/show/ep1">Ep 1</a><a>none</a>"#);
    /// assert_eq!(hrefs, vec!["/show/ep1".to_string()]);
    /// ```
    pub fn extract_hrefs(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    /// Returns the inner HTML of every content element, joined with `<br>`
    pub fn extract_transcript(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        document
            .select(&self.content)
            .map(|element| element.inner_html())
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    }
}
