//! IMDb rating matcher.
//!
//! Signs in, searches for the canonical title, then walks the result list in
//! order and takes the rating from the first title page whose title is
//! similar enough and whose year is exactly the requested one.

use crate::clean::{find_year_in_unformatted_text, search_slug};
use crate::config::{Credentials, EnrichConfig};
use crate::diagnostics::DiagnosticLog;
use crate::document::{Document, select_within};
use crate::error::{ScrapeError, ScrapeResult};
use crate::fetch::{PageFetcher, resolve_link};
use crate::similarity::title_is_accurate_with;

const ORIGINAL_TITLE_MARKER: &str = "(original title)";

/// Fields read from an IMDb title page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePage {
    /// Lowercased original title, or the displayed title without its year.
    pub title: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
}

/// The link to the IMDb-account sign-in form.
pub fn parse_signin_link(body: &str, page_url: &str) -> ScrapeResult<String> {
    let doc = Document::parse(body);
    doc.find("a", &[("class", "list-group-item")])?
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_link(page_url, href))
        .ok_or_else(|| ScrapeError::extraction("sign-in link", page_url))
}

/// Title page links from a search result, in document order.
pub fn parse_result_links(body: &str, root: &str) -> ScrapeResult<Vec<String>> {
    let doc = Document::parse(body);
    let mut links = Vec::new();
    for cell in doc.select("td.result_text")? {
        if let Some(href) = select_within(cell, "a[href]")?
            .into_iter()
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            links.push(resolve_link(root, href));
        }
    }
    Ok(links)
}

pub fn parse_title_page(body: &str) -> ScrapeResult<TitlePage> {
    let doc = Document::parse(body);

    let heading = match doc.find("div", &[("class", "title_wrapper")])? {
        Some(wrapper) => select_within(wrapper, "h1")?
            .into_iter()
            .next()
            .map(|h1| Document::text(h1).replace('\u{a0}', " ")),
        None => None,
    };

    let original = doc
        .find("div", &[("class", "originalTitle")])?
        .map(|div| {
            let text = Document::text(div).to_lowercase();
            match text.split_once(ORIGINAL_TITLE_MARKER) {
                Some((title, _)) => title.trim().to_string(),
                None => text,
            }
        });

    let heading_year = heading.as_deref().and_then(find_year_in_unformatted_text);
    let displayed = heading.as_deref().map(|h| {
        let h = match &heading_year {
            Some(year) => h.replace(&format!("({year})"), ""),
            None => h.to_string(),
        };
        h.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    });

    let listed_year = match doc.select_first("span#titleYear")? {
        Some(span) => select_within(span, "a[href]")?
            .into_iter()
            .next()
            .map(Document::text),
        None => None,
    };

    let rating = doc
        .find("span", &[("itemprop", "ratingValue")])?
        .map(Document::text)
        .filter(|r| !r.is_empty());

    Ok(TitlePage {
        title: original.or(displayed).filter(|t| !t.is_empty()),
        year: listed_year.or(heading_year),
        rating,
    })
}

pub struct RatingMatcher {
    root: String,
    signin_url: String,
    threshold: f64,
}

impl RatingMatcher {
    pub fn new(config: &EnrichConfig) -> Self {
        Self {
            root: config.imdb_root.clone(),
            signin_url: config.imdb_signin_url.clone(),
            threshold: config.accuracy_threshold,
        }
    }

    pub fn search_url(&self, canonical_title: &str) -> String {
        format!(
            "{}/find?q={}&ref_=nv_sr_sm",
            self.root,
            search_slug(canonical_title, "+", false)
        )
    }

    /// Open the sign-in page, follow its IMDb-account link and post the
    /// credentials. The session lives in the fetcher's cookie store.
    pub async fn sign_in<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &F,
        credentials: &Credentials,
    ) -> ScrapeResult<()> {
        let body = fetcher.get(&self.signin_url).await?;
        let form_url = parse_signin_link(&body, &self.signin_url)?;
        fetcher
            .post_form(
                &form_url,
                &[
                    ("email", credentials.email.as_str()),
                    ("password", credentials.password()),
                ],
            )
            .await?;
        tracing::debug!("signed in to IMDb");
        Ok(())
    }

    /// Rating of the first search result that matches `canonical_title` and
    /// `year`, or `None`. Failures are logged; a failing entry is skipped.
    pub async fn match_rating<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &F,
        credentials: &Credentials,
        log: &DiagnosticLog,
        canonical_title: &str,
        year: i32,
        display_title: &str,
    ) -> Option<String> {
        let canonical = canonical_title.trim().to_lowercase();
        if canonical.is_empty() {
            log.log(format!(
                "No original title for {display_title}, skipping IMDb lookup"
            ));
            return None;
        }

        if let Err(e) = self.sign_in(fetcher, credentials).await {
            log.log(format!("Could not sign in to IMDb for {display_title}: {e}"));
            return None;
        }

        let search_url = self.search_url(&canonical);
        let entries = match fetch_result_links(fetcher, &search_url, &self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                log.log(format!("IMDb search for {canonical} failed: {e}"));
                return None;
            }
        };

        let wanted_year = year.to_string();
        for entry in entries {
            let page = match fetch_title_page(fetcher, &entry).await {
                Ok(page) => page,
                Err(e) => {
                    log.log(format!("Skipping IMDb entry {entry}: {e}"));
                    continue;
                }
            };

            let Some(title) = page.title.as_deref() else {
                log.log(ScrapeError::extraction("title", &entry).to_string());
                continue;
            };
            if !title_is_accurate_with(title, &canonical, self.threshold)
                || page.year.as_deref() != Some(wanted_year.as_str())
            {
                tracing::debug!(entry = %entry, title = %title, year = ?page.year, "IMDb entry does not match");
                continue;
            }

            match page.rating {
                Some(rating) => return Some(rating),
                None => log.log(ScrapeError::extraction("rating", &entry).to_string()),
            }
        }

        None
    }
}

async fn fetch_result_links<F: PageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    root: &str,
) -> ScrapeResult<Vec<String>> {
    let body = fetcher.get(url).await?;
    parse_result_links(&body, root)
}

async fn fetch_title_page<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> ScrapeResult<TitlePage> {
    let body = fetcher.get(url).await?;
    parse_title_page(&body)
}
