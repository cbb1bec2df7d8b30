use serde::{Deserialize, Serialize};

pub mod clean;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod fetch;
pub mod filmaffinity;
pub mod imdb;
pub mod pipeline;
pub mod similarity;
pub mod testing;

pub use config::{Credentials, EnrichConfig, Region};
pub use diagnostics::DiagnosticLog;
pub use error::{ScrapeError, ScrapeResult};
pub use fetch::{HttpFetcher, PageFetcher};
pub use filmaffinity::{CandidateMovie, CandidateResolver, Resolution, SearchOutcome};
pub use imdb::RatingMatcher;
pub use pipeline::Enricher;

/// One movie to enrich: the title as the caller knows it (often a local
/// release title) and its release year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieQuery {
    pub display_title: String,
    pub year: i32,
}

impl MovieQuery {
    pub fn new(display_title: impl Into<String>, year: i32) -> Self {
        Self {
            display_title: display_title.into(),
            year,
        }
    }
}

/// Consolidated data for one movie.
///
/// `critic_excerpts` is `None` when the page had no critic blocks, which is
/// different from `Some(vec![])`. `rating` is `None` when no IMDb entry
/// matched with confidence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MovieRecord {
    pub canonical_title: String,
    pub year: i32,
    pub synopsis: String,
    pub critic_excerpts: Option<Vec<String>>,
    pub rating: Option<String>,
}

impl MovieRecord {
    pub fn from_resolution(resolution: Resolution, year: i32, rating: Option<String>) -> Self {
        Self {
            canonical_title: resolution.canonical_title,
            year,
            synopsis: resolution.synopsis,
            critic_excerpts: resolution.critic_excerpts,
            rating,
        }
    }

    /// True when every field the sources can provide was filled.
    pub fn is_complete(&self) -> bool {
        !self.canonical_title.is_empty() && !self.synopsis.is_empty() && self.rating.is_some()
    }
}
