//! Canned-page fetcher for tests.

use crate::error::{ScrapeError, ScrapeResult};
use crate::fetch::PageFetcher;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// A recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get(String),
    Post { url: String, fields: Vec<(String, String)> },
}

/// Serves fixed HTML by exact URL. Unknown URLs yield `NotFound`; URLs
/// registered with `with_failure` yield a 503.
///
/// ```rust
/// use movie_scrape::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_page("https://a.test/search", "<html></html>")
///     .with_failure("https://b.test/signin");
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    requests: Arc<RwLock<Vec<Request>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.write().unwrap().insert(url.into(), html.into());
    }

    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(url.into());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.read().unwrap().clone()
    }

    /// URLs requested with GET, in order.
    pub fn get_urls(&self) -> Vec<String> {
        self.requests
            .read()
            .unwrap()
            .iter()
            .filter_map(|r| match r {
                Request::Get(url) => Some(url.clone()),
                Request::Post { .. } => None,
            })
            .collect()
    }

    fn respond(&self, url: &str) -> ScrapeResult<String> {
        if self.failing.read().unwrap().contains(url) {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::NotFound {
                url: url.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl PageFetcher for MockFetcher {
    async fn get(&self, url: &str) -> ScrapeResult<String> {
        self.requests
            .write()
            .unwrap()
            .push(Request::Get(url.to_string()));
        self.respond(url)
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> ScrapeResult<String> {
        self.requests.write().unwrap().push(Request::Post {
            url: url.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.respond(url)
    }
}
