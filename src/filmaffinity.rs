//! Candidate resolver for FilmAffinity.
//!
//! Search: `<root>search.php?stext=<lowercased-hyphen-slug>&stype=all`.
//! When the search lands directly on a film, the page carries a
//! `dl.movie-info` block whose first `dd` is the original title. Otherwise it
//! lists `div.se-it.mt` entries (title link + year) and the right one is
//! picked by exact title and a year within tolerance, then re-fetched.

use crate::clean::{clean_text, ensure_period, search_slug, strip_rating};
use crate::config::EnrichConfig;
use crate::diagnostics::DiagnosticLog;
use crate::document::{Document, select_within};
use crate::error::{ScrapeError, ScrapeResult};
use crate::fetch::{PageFetcher, resolve_link};

const TITLE_SELECTOR: &str = r#"dl[class="movie-info"] > dd"#;
const CANDIDATE_SELECTOR: &str = r#"div[class="se-it mt"]"#;
const CANDIDATE_YEAR_SELECTOR: &str = r#"div[class="ye-w"]"#;
const REVIEW_SELECTOR: &str = r#"div[itemprop="reviewBody"]"#;

/// What the resolver learned about one movie. Empty/`None` fields mean the
/// corresponding lookup failed; the failure is in the diagnostic log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub canonical_title: String,
    pub synopsis: String,
    pub critic_excerpts: Option<Vec<String>>,
}

/// One entry of an ambiguous search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMovie {
    pub title: String,
    pub year: i32,
    pub detail_url: String,
}

/// Raw (uncleaned) fields read from a film page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub critics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search resolved to a single film page.
    Unique(DetailPage),
    /// Several films matched; these are the listed entries.
    Ambiguous(Vec<CandidateMovie>),
}

/// Read the film fields from a page. Missing pieces are left empty.
pub fn parse_detail_page(body: &str) -> ScrapeResult<DetailPage> {
    let doc = Document::parse(body);

    let title = doc.select_first(TITLE_SELECTOR)?.map(Document::text);
    let synopsis = doc
        .find("dd", &[("itemprop", "description")])?
        .map(Document::text);
    let critics = doc
        .select(REVIEW_SELECTOR)?
        .into_iter()
        .map(Document::text)
        .collect();

    Ok(DetailPage {
        title,
        synopsis,
        critics,
    })
}

/// Classify a search response as a direct hit or a candidate list.
pub fn parse_search_page(body: &str, page_url: &str) -> ScrapeResult<SearchOutcome> {
    let detail = parse_detail_page(body)?;
    if detail.title.is_some() {
        return Ok(SearchOutcome::Unique(detail));
    }

    let doc = Document::parse(body);
    let mut candidates = Vec::new();
    for entry in doc.select(CANDIDATE_SELECTOR)? {
        let Some(link) = select_within(entry, "a[href]")?.into_iter().next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = link
            .value()
            .attr("title")
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| Document::text(link));

        let year_text = select_within(entry, CANDIDATE_YEAR_SELECTOR)?
            .into_iter()
            .next()
            .map(Document::text)
            .unwrap_or_default();
        let Ok(year) = year_text.parse::<i32>() else {
            tracing::debug!(title = %title, year = %year_text, "skipping candidate without a year");
            continue;
        };

        candidates.push(CandidateMovie {
            title,
            year,
            detail_url: resolve_link(page_url, href),
        });
    }
    Ok(SearchOutcome::Ambiguous(candidates))
}

/// First candidate whose title equals `display_title` (ignoring case) and
/// whose year is within `tolerance` of `year`. Entries with a different
/// title are never chosen, however close their year.
pub fn pick_candidate<'c>(
    candidates: &'c [CandidateMovie],
    display_title: &str,
    year: i32,
    tolerance: u32,
) -> Option<&'c CandidateMovie> {
    let wanted = display_title.trim().to_lowercase();
    candidates
        .iter()
        .filter(|c| c.title.trim().to_lowercase() == wanted)
        .find(|c| c.year.abs_diff(year) <= tolerance)
}

pub struct CandidateResolver {
    root: String,
    number_critics: usize,
    rating_label: String,
    year_tolerance: u32,
}

impl CandidateResolver {
    pub fn new(config: &EnrichConfig) -> Self {
        Self {
            root: config.filmaffinity_root.clone(),
            number_critics: config.number_critics,
            rating_label: config.rating_label.clone(),
            year_tolerance: config.year_tolerance,
        }
    }

    pub fn search_url(&self, display_title: &str) -> String {
        format!(
            "{}search.php?stext={}&stype=all",
            self.root,
            search_slug(display_title, "-", true)
        )
    }

    /// Resolve `display_title` to its canonical title, synopsis and critic
    /// excerpts. Never fails: problems are logged and yield empty fields.
    pub async fn resolve<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &F,
        log: &DiagnosticLog,
        display_title: &str,
        year: i32,
    ) -> Resolution {
        let url = self.search_url(display_title);
        let outcome = match fetch_search(fetcher, &url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log.log(format!("Search for {display_title} on FilmAffinity failed: {e}"));
                return Resolution::default();
            }
        };

        let (detail, page_url) = match outcome {
            SearchOutcome::Unique(detail) => (detail, url),
            SearchOutcome::Ambiguous(candidates) => {
                log.log(format!(
                    "Found more than 1 movie for {display_title} ({} candidates listed)",
                    candidates.len()
                ));
                let Some(candidate) =
                    pick_candidate(&candidates, display_title, year, self.year_tolerance)
                else {
                    log.log(format!(
                        "No FilmAffinity candidate matches {display_title} ({year})"
                    ));
                    return Resolution::default();
                };
                match fetch_detail(fetcher, &candidate.detail_url).await {
                    Ok(detail) => (detail, candidate.detail_url.clone()),
                    Err(e) => {
                        log.log(format!(
                            "Could not read FilmAffinity page {} for {display_title}: {e}",
                            candidate.detail_url
                        ));
                        return Resolution::default();
                    }
                }
            }
        };

        if detail.title.is_none() {
            log.log(ScrapeError::extraction("original title", &page_url).to_string());
        }
        self.build_resolution(detail)
    }

    /// Clean the raw page fields into a `Resolution`.
    pub fn build_resolution(&self, detail: DetailPage) -> Resolution {
        let canonical_title = detail
            .title
            .map(|t| clean_text(&t))
            .unwrap_or_default();
        let synopsis = detail
            .synopsis
            .map(|s| ensure_period(clean_text(&s)))
            .unwrap_or_default();
        let critic_excerpts = if detail.critics.is_empty() {
            None
        } else {
            Some(
                detail
                    .critics
                    .iter()
                    .take(self.number_critics)
                    .map(|c| strip_rating(&ensure_period(clean_text(c)), &self.rating_label))
                    .collect(),
            )
        };

        Resolution {
            canonical_title,
            synopsis,
            critic_excerpts,
        }
    }
}

async fn fetch_search<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> ScrapeResult<SearchOutcome> {
    let body = fetcher.get(url).await?;
    parse_search_page(&body, url)
}

async fn fetch_detail<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> ScrapeResult<DetailPage> {
    let body = fetcher.get(url).await?;
    parse_detail_page(&body)
}
