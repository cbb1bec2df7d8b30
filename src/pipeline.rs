//! Enrichment pipeline: FilmAffinity first, then IMDb keyed on the title
//! FilmAffinity reports.

use crate::config::{Credentials, EnrichConfig};
use crate::diagnostics::DiagnosticLog;
use crate::error::ScrapeResult;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::filmaffinity::CandidateResolver;
use crate::imdb::RatingMatcher;
use crate::{MovieQuery, MovieRecord};
use indexmap::IndexMap;

pub struct Enricher<F: PageFetcher> {
    fetcher: F,
    credentials: Credentials,
    log: DiagnosticLog,
    resolver: CandidateResolver,
    matcher: RatingMatcher,
}

impl Enricher<HttpFetcher> {
    /// Enricher that talks to the live sites.
    pub fn with_http(
        credentials: Credentials,
        config: EnrichConfig,
        log: DiagnosticLog,
    ) -> ScrapeResult<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout)?;
        Ok(Self::new(fetcher, credentials, config, log))
    }
}

impl<F: PageFetcher> Enricher<F> {
    pub fn new(fetcher: F, credentials: Credentials, config: EnrichConfig, log: DiagnosticLog) -> Self {
        Self {
            resolver: CandidateResolver::new(&config),
            matcher: RatingMatcher::new(&config),
            fetcher,
            credentials,
            log,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Enrich one movie. Always produces a record; fields that could not be
    /// found are left empty.
    pub async fn enrich_one(&self, query: &MovieQuery) -> MovieRecord {
        let resolution = self
            .resolver
            .resolve(&self.fetcher, &self.log, &query.display_title, query.year)
            .await;
        let rating = self
            .matcher
            .match_rating(
                &self.fetcher,
                &self.credentials,
                &self.log,
                &resolution.canonical_title,
                query.year,
                &query.display_title,
            )
            .await;
        MovieRecord::from_resolution(resolution, query.year, rating)
    }

    /// Enrich every query in order, one at a time. The result is keyed by
    /// display title and keeps input order.
    pub async fn enrich(&self, queries: &[MovieQuery]) -> IndexMap<String, MovieRecord> {
        let mut records = IndexMap::with_capacity(queries.len());
        for query in queries {
            tracing::info!(title = %query.display_title, year = query.year, "Completing movie");
            let record = self.enrich_one(query).await;
            tracing::info!(
                title = %query.display_title,
                canonical = %record.canonical_title,
                rating = ?record.rating,
                complete = record.is_complete(),
                "Done"
            );
            records.insert(query.display_title.clone(), record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    fn config() -> EnrichConfig {
        EnrichConfig::default()
            .with_filmaffinity_root("https://fa.test/en/")
            .with_imdb_root("https://imdb.test")
            .with_imdb_signin_url("https://imdb.test/signin")
    }

    #[tokio::test]
    async fn test_every_query_gets_a_record_in_input_order() {
        let enricher = Enricher::new(
            MockFetcher::new(),
            Credentials::new("a@b.c", "pw"),
            config(),
            DiagnosticLog::disabled(),
        );
        let queries = vec![
            MovieQuery::new("Zodiac", 2007),
            MovieQuery::new("Alien", 1979),
            MovieQuery::new("Memento", 2000),
        ];

        let records = enricher.enrich(&queries).await;
        let keys: Vec<&str> = records.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zodiac", "Alien", "Memento"]);
        for (query, record) in queries.iter().zip(records.values()) {
            assert_eq!(record.year, query.year);
            assert_eq!(record.canonical_title, "");
            assert_eq!(record.critic_excerpts, None);
            assert_eq!(record.rating, None);
            assert!(!record.is_complete());
        }
    }

    #[tokio::test]
    async fn test_search_urls_follow_input_order() {
        let enricher = Enricher::new(
            MockFetcher::new(),
            Credentials::new("a@b.c", "pw"),
            config(),
            DiagnosticLog::disabled(),
        );
        enricher
            .enrich(&[MovieQuery::new("Zodiac", 2007), MovieQuery::new("Alien", 1979)])
            .await;
        assert_eq!(
            enricher.fetcher().get_urls(),
            vec![
                "https://fa.test/en/search.php?stext=zodiac&stype=all".to_string(),
                "https://fa.test/en/search.php?stext=alien&stype=all".to_string(),
            ]
        );
    }
}
