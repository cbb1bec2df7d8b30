//! Typed errors for fetching and extracting movie pages.

use thiserror::Error;

/// Errors raised while talking to a movie site or reading its markup.
///
/// None of these are fatal to an enrichment pass: the resolver, matcher and
/// pipeline catch them at the narrowest scope and record them in the
/// diagnostic log.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure (DNS, TLS, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The site answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Expected markup was not present on the page.
    #[error("could not find {what} on {url}")]
    Extraction { what: &'static str, url: String },

    #[error("selector error: {0}")]
    Selector(String),

    /// No canned page for this URL (test fetcher).
    #[error("no page for {url}")]
    NotFound { url: String },

    #[error("config error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub(crate) fn extraction(what: &'static str, url: &str) -> Self {
        Self::Extraction {
            what,
            url: url.to_string(),
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
