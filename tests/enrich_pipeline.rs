//! End-to-end enrichment against canned FilmAffinity and IMDb pages.

use movie_scrape::testing::MockFetcher;
use movie_scrape::{Credentials, DiagnosticLog, EnrichConfig, Enricher, MovieQuery, MovieRecord};

const FA_SEARCH: &str = "https://fa.test/en/search.php?stext=example-movie&stype=all";
const SIGNIN: &str = "https://imdb.test/registration/signin";
const IMDB_SEARCH: &str = "https://imdb.test/find?q=original+example&ref_=nv_sr_sm";

fn config() -> EnrichConfig {
    EnrichConfig::default()
        .with_filmaffinity_root("https://fa.test/en/")
        .with_imdb_root("https://imdb.test")
        .with_imdb_signin_url(SIGNIN)
}

fn fa_detail(title: &str, synopsis: &str) -> String {
    format!(
        r#"<html><body>
            <dl class="movie-info"><dt>Original title</dt><dd>{title}</dd>
            <dt>Synopsis</dt><dd itemprop="description">{synopsis}</dd></dl>
        </body></html>"#
    )
}

fn imdb_title(heading: &str, year: u32, rating: &str) -> String {
    format!(
        r#"<html><body>
            <div class="title_wrapper"><h1>{heading}&nbsp;<span id="titleYear">(<a href="/year/{year}/">{year}</a>)</span></h1></div>
            <span itemprop="ratingValue">{rating}</span>
        </body></html>"#
    )
}

/// FilmAffinity unique hit plus a signed-in IMDb with one matching entry.
fn happy_fetcher() -> MockFetcher {
    MockFetcher::new()
        .with_page(FA_SEARCH, fa_detail("Original Example", "A story"))
        .with_page(
            SIGNIN,
            r#"<a class="list-group-item" href="/ap/signin">Sign in with IMDb</a>"#,
        )
        .with_page("https://imdb.test/ap/signin", "<html></html>")
        .with_page(
            IMDB_SEARCH,
            r#"<table><tr><td class="result_text"><a href="/title/tt0000001/">Original Example</a> (2020)</td></tr></table>"#,
        )
        .with_page(
            "https://imdb.test/title/tt0000001/",
            imdb_title("Original Example", 2020, "7.5"),
        )
}

fn enricher(fetcher: MockFetcher, log: DiagnosticLog) -> Enricher<MockFetcher> {
    Enricher::new(fetcher, Credentials::new("me@example.com", "pw"), config(), log)
}

#[tokio::test]
async fn test_unique_hit_with_rating() {
    let enricher = enricher(happy_fetcher(), DiagnosticLog::disabled());

    let records = enricher.enrich(&[MovieQuery::new("Example Movie", 2020)]).await;

    assert_eq!(
        records.get("Example Movie"),
        Some(&MovieRecord {
            canonical_title: "Original Example".to_string(),
            year: 2020,
            synopsis: "A story.".to_string(),
            critic_excerpts: None,
            rating: Some("7.5".to_string()),
        })
    );
}

#[tokio::test]
async fn test_ambiguous_search_picks_title_and_year_match() {
    let fetcher = happy_fetcher();
    fetcher.add_page(
        FA_SEARCH,
        r#"<html><body>
            <div class="se-it mt"><div class="ye-w">2015</div><a href="/en/film15.html" title="Example Movie">Example Movie</a></div>
            <div class="se-it mt"><div class="ye-w">2020</div><a href="/en/films20.html" title="Example Movies">Example Movies</a></div>
            <div class="se-it mt"><div class="ye-w">2021</div><a href="/en/film21.html" title="EXAMPLE MOVIE">EXAMPLE MOVIE</a></div>
        </body></html>"#,
    );
    fetcher.add_page(
        "https://fa.test/en/film21.html",
        fa_detail("Original Example", "A story"),
    );
    let enricher = enricher(fetcher, DiagnosticLog::disabled());

    let records = enricher.enrich(&[MovieQuery::new("Example Movie", 2020)]).await;

    let record = &records["Example Movie"];
    assert_eq!(record.canonical_title, "Original Example");
    assert_eq!(record.synopsis, "A story.");
    assert_eq!(record.rating.as_deref(), Some("7.5"));

    let fa_requests: Vec<String> = enricher
        .fetcher()
        .get_urls()
        .into_iter()
        .filter(|u| u.starts_with("https://fa.test"))
        .collect();
    assert_eq!(
        fa_requests,
        vec![FA_SEARCH.to_string(), "https://fa.test/en/film21.html".to_string()]
    );
}

#[tokio::test]
async fn test_signin_failure_keeps_filmaffinity_data() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let fetcher = MockFetcher::new()
        .with_page(FA_SEARCH, fa_detail("Original Example", "A story"))
        .with_failure(SIGNIN);
    let enricher = enricher(fetcher, DiagnosticLog::new(&log_path));

    let records = enricher.enrich(&[MovieQuery::new("Example Movie", 2020)]).await;

    let record = &records["Example Movie"];
    assert_eq!(record.canonical_title, "Original Example");
    assert_eq!(record.synopsis, "A story.");
    assert_eq!(record.rating, None);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("Could not sign in to IMDb for Example Movie"));
}

#[tokio::test]
async fn test_record_serialises_absent_fields_as_null() {
    let enricher = enricher(MockFetcher::new(), DiagnosticLog::disabled());
    let records = enricher.enrich(&[MovieQuery::new("Example Movie", 2020)]).await;

    let json = serde_json::to_value(&records).unwrap();
    let record = &json["Example Movie"];
    assert!(record["critic_excerpts"].is_null());
    assert!(record["rating"].is_null());
    assert_eq!(record["year"], 2020);
}
