//! Crawler coordinator - traversal and transcript persistence
//!
//! This module contains the traversal that coordinates fetching, link
//! selection, transcript extraction, parsing and storage.
//!
//! Starting from the configured URL at depth 0, the coordinator fetches the
//! page and scans its anchors in document order. The first link that starts
//! with the starting URL and is not the page itself is fetched as a
//! transcript, parsed, and stored. The traversal then stops; it does not
//! follow links found on the transcript page.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::PageExtractor;
use crate::storage::{ObjectStore, PutOutcome};
use crate::transcript::{parse_transcript, to_pretty_json};
use crate::url::{base_url, derive_key, first_qualifying_link};
use crate::TranscriptError;
use url::Url;

/// Traversal position for one `visit` call
#[derive(Debug, Clone)]
pub struct CrawlState {
    pub current_url: String,
    pub depth: u32,
    pub starting_url: String,
    pub base_url: Url,
}

impl CrawlState {
    /// State for the first visit: the starting URL at depth 0
    pub fn root(starting_url: &str) -> Result<Self, TranscriptError> {
        Ok(Self {
            current_url: starting_url.to_string(),
            depth: 0,
            starting_url: starting_url.to_string(),
            base_url: base_url(starting_url)?,
        })
    }

    /// State for visiting `url` one level below this one
    pub fn child(&self, url: &str) -> Self {
        Self {
            current_url: url.to_string(),
            depth: self.depth + 1,
            ..self.clone()
        }
    }
}

/// Whether the transcript body made it into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Stored(PutOutcome),
    Failed(String),
}

/// A transcript page that was fetched and parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTranscript {
    pub url: String,
    pub key: String,
    pub turns: usize,
    pub upload: UploadStatus,
}

/// Summary of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages successfully loaded by the fetch session
    pub pages_fetched: usize,

    /// Qualifying link chosen on the visited page
    pub selected_link: Option<String>,

    /// Transcript processed for the selected link
    pub transcript: Option<StoredTranscript>,

    /// A visit was cut off by the depth limit
    pub depth_exceeded: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ObjectStore> {
    config: CrawlerConfig,
    extractor: PageExtractor,
    store: S,
}

impl<S: ObjectStore> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The traversal configuration
    /// * `store` - Where parsed transcripts are written
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TranscriptError)` - The content selector is invalid
    pub fn new(config: &CrawlerConfig, store: S) -> Result<Self, TranscriptError> {
        Ok(Self {
            extractor: PageExtractor::new(&config.content_selector)?,
            config: config.clone(),
            store,
        })
    }

    /// Returns the object store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the coordinator and returns its object store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs a crawl from the configured starting URL
    ///
    /// The session is owned by the crawl and released exactly once, whether
    /// the traversal completes, hits the depth limit, or fails to navigate.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Crawl finished
    /// * `Err(TranscriptError)` - A page could not be loaded
    pub async fn crawl<F: PageFetcher>(
        &mut self,
        mut session: F,
    ) -> Result<CrawlReport, TranscriptError> {
        tracing::info!(
            "Starting crawl at {} (max depth {})",
            self.config.starting_url,
            self.config.max_depth
        );

        let mut report = CrawlReport::default();
        let result = match CrawlState::root(&self.config.starting_url) {
            Ok(state) => self.visit(&mut session, &state, &mut report).await,
            Err(e) => Err(e),
        };

        session.release().await;

        result.map(|()| report)
    }

    /// Visits one page and processes the first qualifying link on it
    ///
    /// # Steps
    ///
    /// 1. Stop if `depth` exceeds the maximum depth
    /// 2. Fetch the page
    /// 3. Resolve every anchor against the base URL
    /// 4. Pick the first link under the starting URL that is not this page
    /// 5. Fetch, parse and store that link, then stop
    pub async fn visit<F: PageFetcher>(
        &mut self,
        session: &mut F,
        state: &CrawlState,
        report: &mut CrawlReport,
    ) -> Result<(), TranscriptError> {
        if state.depth > self.config.max_depth {
            tracing::info!(
                "Depth {} exceeds max depth {}, not visiting {}",
                state.depth,
                self.config.max_depth,
                state.current_url
            );
            report.depth_exceeded = true;
            return Ok(());
        }

        let html = self.navigate(session, &state.current_url, report).await?;
        let hrefs = self.extractor.extract_hrefs(&html);
        tracing::debug!("Found {} links on {}", hrefs.len(), state.current_url);

        let selected = first_qualifying_link(
            hrefs.iter().map(String::as_str),
            &state.base_url,
            &state.starting_url,
            &state.current_url,
        );

        match selected {
            Some(link) => {
                tracing::info!("Selected transcript link {}", link);
                report.selected_link = Some(link.clone());
                let child = state.child(&link);
                let transcript = self.fetch_and_store(session, &child, report).await?;
                report.transcript = Some(transcript);
            }
            None => {
                tracing::info!("No qualifying links on {}", state.current_url);
            }
        }

        Ok(())
    }

    /// Fetches a transcript page, parses it and writes it to the store
    ///
    /// Storage failures are logged and reported but do not fail the crawl.
    async fn fetch_and_store<F: PageFetcher>(
        &mut self,
        session: &mut F,
        state: &CrawlState,
        report: &mut CrawlReport,
    ) -> Result<StoredTranscript, TranscriptError> {
        let url = &state.current_url;
        let html = self.navigate(session, url, report).await?;

        let content = self.extractor.extract_transcript(&html);
        let turns = parse_transcript(&content);
        tracing::info!("Parsed {} turns from {}", turns.len(), url);

        let key = derive_key(url, &state.starting_url)?;
        let body = to_pretty_json(&turns)?;

        let upload = match self.store.put_object(&key, body.as_bytes()) {
            Ok(outcome) => {
                tracing::info!(
                    "Successfully uploaded {} to {} ({})",
                    key,
                    self.store.bucket(),
                    outcome.as_str()
                );
                UploadStatus::Stored(outcome)
            }
            Err(e) => {
                tracing::error!("Failed to upload {}: {}", key, e);
                UploadStatus::Failed(e.to_string())
            }
        };

        Ok(StoredTranscript {
            url: url.clone(),
            key,
            turns: turns.len(),
            upload,
        })
    }

    async fn navigate<F: PageFetcher>(
        &self,
        session: &mut F,
        url: &str,
        report: &mut CrawlReport,
    ) -> Result<String, TranscriptError> {
        match session.fetch(url).await {
            Ok(html) => {
                report.pages_fetched += 1;
                Ok(html)
            }
            Err(e) => {
                tracing::error!("Failed to go to URL: {}", url);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;
    use crate::storage::{ObjectSummary, SqliteObjectStore, StorageError, StorageResult, StoredObject};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory fetch session recording every request
    #[derive(Default)]
    struct FakeSession {
        pages: HashMap<String, String>,
        fetched: Vec<String>,
        releases: usize,
    }

    impl FakeSession {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSession {
        async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
            self.fetched.push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }

        async fn release(&mut self) {
            self.releases += 1;
        }
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl ObjectStore for BrokenStore {
        fn bucket(&self) -> &str {
            "broken"
        }

        fn put_object(&mut self, _key: &str, _body: &[u8]) -> StorageResult<PutOutcome> {
            Err(StorageError::Database("disk full".to_string()))
        }

        fn get_object(&self, _key: &str) -> StorageResult<Option<StoredObject>> {
            Ok(None)
        }

        fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>> {
            Ok(Vec::new())
        }

        fn count_objects(&self) -> StorageResult<u64> {
            Ok(0)
        }
    }

    const START: &str = "https://site.com/show";

    fn config() -> CrawlerConfig {
        CrawlerConfig {
            starting_url: START.to_string(),
            max_depth: 3,
            content_selector: ".cnnBodyText".to_string(),
        }
    }

    fn coordinator() -> Coordinator<SqliteObjectStore> {
        let store = SqliteObjectStore::open_in_memory("test-bucket").unwrap();
        Coordinator::new(&config(), store).unwrap()
    }

    const INDEX: &str = r#"<html><body>
        <a href="/show">Index</a>
        <a href="/show/ep1">Episode 1</a>
        <a href="https://other.com/x">Elsewhere</a>
        <a href="/show/ep2">Episode 2</a>
    </body></html>"#;

    const EPISODE: &str = r#"<html><body>
        <div class="cnnBodyText">LARRY KING, HOST: Good evening.<br>(APPLAUSE)<br>JOHN: Hi there<br>how are you?</div>
        <a href="/show/ep3">Next</a>
    </body></html>"#;

    #[tokio::test]
    async fn test_selects_first_qualifying_link() {
        let mut session = FakeSession::default()
            .with_page(START, INDEX)
            .with_page("https://site.com/show/ep1", EPISODE);
        let mut coordinator = coordinator();

        let report = coordinator.crawl(&mut session).await.unwrap();

        assert_eq!(
            report.selected_link.as_deref(),
            Some("https://site.com/show/ep1")
        );
        assert_eq!(session.fetched, vec![START, "https://site.com/show/ep1"]);
        assert!(!session.fetched.iter().any(|u| u.contains("other.com")));
        assert_eq!(report.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_stores_consolidated_turns_under_derived_key() {
        let mut session = FakeSession::default()
            .with_page(START, INDEX)
            .with_page("https://site.com/show/ep1", EPISODE);
        let mut coordinator = coordinator();

        let report = coordinator.crawl(&mut session).await.unwrap();
        let transcript = report.transcript.unwrap();
        assert_eq!(transcript.key, "ep1.json");
        assert_eq!(transcript.turns, 3);
        assert_eq!(transcript.upload, UploadStatus::Stored(PutOutcome::Created));

        let object = coordinator.store().get_object("ep1.json").unwrap().unwrap();
        let turns: Vec<crate::SpeakerTurn> = serde_json::from_slice(&object.body).unwrap();
        assert_eq!(
            turns,
            vec![
                crate::SpeakerTurn::new("assistant", "Good evening."),
                crate::SpeakerTurn::new("system", "(APPLAUSE)"),
                crate::SpeakerTurn::new("JOHN", "Hi there how are you?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_does_not_follow_links_on_transcript_page() {
        let mut session = FakeSession::default()
            .with_page(START, INDEX)
            .with_page("https://site.com/show/ep1", EPISODE)
            .with_page("https://site.com/show/ep3", EPISODE);
        let mut coordinator = coordinator();

        coordinator.crawl(&mut session).await.unwrap();

        assert!(!session.fetched.contains(&"https://site.com/show/ep3".to_string()));
        assert!(!session.fetched.contains(&"https://site.com/show/ep2".to_string()));
        assert_eq!(coordinator.store().count_objects().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_qualifying_link() {
        let mut session = FakeSession::default().with_page(
            START,
            r#"<a href="/show">Self</a><a href="https://other.com/show/ep1">Other</a>"#,
        );
        let mut coordinator = coordinator();

        let report = coordinator.crawl(&mut session).await.unwrap();

        assert_eq!(report.selected_link, None);
        assert_eq!(report.transcript, None);
        assert_eq!(session.fetched, vec![START]);
        assert_eq!(session.releases, 1);
    }

    #[tokio::test]
    async fn test_session_released_once_after_transcript() {
        let mut session = FakeSession::default()
            .with_page(START, INDEX)
            .with_page("https://site.com/show/ep1", EPISODE);
        let mut coordinator = coordinator();

        coordinator.crawl(&mut session).await.unwrap();
        assert_eq!(session.releases, 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_propagates_and_releases() {
        let mut session = FakeSession::default();
        let mut coordinator = coordinator();

        let err = coordinator.crawl(&mut session).await.unwrap_err();

        assert!(matches!(err, TranscriptError::Navigation(_)));
        assert_eq!(session.releases, 1);
    }

    #[tokio::test]
    async fn test_transcript_navigation_failure_propagates() {
        let mut session = FakeSession::default().with_page(START, INDEX);
        let mut coordinator = coordinator();

        let err = coordinator.crawl(&mut session).await.unwrap_err();

        assert!(matches!(err, TranscriptError::Navigation(_)));
        assert_eq!(session.fetched, vec![START, "https://site.com/show/ep1"]);
        assert_eq!(coordinator.store().count_objects().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_abort() {
        let mut session = FakeSession::default()
            .with_page(START, INDEX)
            .with_page("https://site.com/show/ep1", EPISODE);
        let mut coordinator = Coordinator::new(&config(), BrokenStore).unwrap();

        let report = coordinator.crawl(&mut session).await.unwrap();

        let transcript = report.transcript.unwrap();
        assert!(matches!(transcript.upload, UploadStatus::Failed(_)));
        assert_eq!(session.releases, 1);
    }

    #[tokio::test]
    async fn test_visit_beyond_max_depth_never_fetches() {
        let mut session = FakeSession::default().with_page(START, INDEX);
        let mut coordinator = coordinator();
        let mut report = CrawlReport::default();

        let mut state = CrawlState::root(START).unwrap();
        state.depth = 4;

        coordinator
            .visit(&mut session, &state, &mut report)
            .await
            .unwrap();

        assert!(session.fetched.is_empty());
        assert!(report.depth_exceeded);
    }

    #[tokio::test]
    async fn test_visit_at_max_depth_still_fetches() {
        let mut session = FakeSession::default().with_page(START, "<p>empty</p>");
        let mut coordinator = coordinator();
        let mut report = CrawlReport::default();

        let mut state = CrawlState::root(START).unwrap();
        state.depth = 3;

        coordinator
            .visit(&mut session, &state, &mut report)
            .await
            .unwrap();

        assert_eq!(session.fetched, vec![START]);
        assert!(!report.depth_exceeded);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let mut coordinator = coordinator();

        for expected in [PutOutcome::Created, PutOutcome::Unchanged] {
            let mut session = FakeSession::default()
                .with_page(START, INDEX)
                .with_page("https://site.com/show/ep1", EPISODE);
            let report = coordinator.crawl(&mut session).await.unwrap();
            assert_eq!(
                report.transcript.unwrap().upload,
                UploadStatus::Stored(expected)
            );
        }
        assert_eq!(coordinator.store().count_objects().unwrap(), 1);
    }

    #[test]
    fn test_child_state() {
        let root = CrawlState::root(START).unwrap();
        let child = root.child("https://site.com/show/ep1");
        assert_eq!(child.depth, 1);
        assert_eq!(child.starting_url, START);
        assert_eq!(child.base_url.as_str(), "https://site.com/");
    }
}
