use crate::error::{ScrapeError, ScrapeResult};
use reqwest::{Client, header};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Source of raw HTML pages. Both movie sites are read through this seam so
/// tests can serve fixed documents instead of hitting the network.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body.
    async fn get(&self, url: &str) -> ScrapeResult<String>;

    /// POST a url-encoded form and return the response body.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> ScrapeResult<String>;
}

/// Make `href` absolute against the page it was found on.
pub fn resolve_link(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        return href.to_string();
    }
    url::Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// reqwest-backed fetcher. Cookies set by any response (e.g. the IMDb
/// sign-in) are replayed on later requests.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> ScrapeResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.8"),
        );
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            header::HeaderValue::from_static("1"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("max-age=0"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn read_body(resp: reqwest::Response) -> ScrapeResult<String> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: resp.url().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> ScrapeResult<String> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).send().await?;
        Self::read_body(resp).await
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> ScrapeResult<String> {
        tracing::debug!(url, "POST form");
        let resp = self.client.post(url).form(fields).send().await?;
        Self::read_body(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("https://www.imdb.com", "/title/tt0113277/?ref_=fn_al_tt_1"),
            "https://www.imdb.com/title/tt0113277/?ref_=fn_al_tt_1"
        );
        assert_eq!(
            resolve_link("https://www.filmaffinity.com/en/", "https://www.filmaffinity.com/en/film1.html"),
            "https://www.filmaffinity.com/en/film1.html"
        );
        assert_eq!(
            resolve_link("https://www.filmaffinity.com/en/", "film2.html"),
            "https://www.filmaffinity.com/en/film2.html"
        );
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }
}
