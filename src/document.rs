//! Thin query interface over a parsed HTML page.
//!
//! Extraction code only needs three things from a page: select by CSS
//! selector, find the first tag with given attributes, and read an
//! element's text. Keeping them here pins the `scraper` dependency to one
//! module.

use crate::error::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};

pub struct Document {
    html: Html,
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector(format!("{selector}: {e}")))
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> ScrapeResult<Vec<ElementRef<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).collect())
    }

    pub fn select_first(&self, selector: &str) -> ScrapeResult<Option<ElementRef<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next())
    }

    /// First `tag` element whose attributes match every `(name, value)` pair.
    ///
    /// `class` matches either the whole attribute or one of its classes.
    pub fn find(&self, tag: &str, attrs: &[(&str, &str)]) -> ScrapeResult<Option<ElementRef<'_>>> {
        let sel = parse_selector(tag)?;
        Ok(self
            .html
            .select(&sel)
            .find(|el| attrs.iter().all(|(name, value)| attr_matches(*el, name, value))))
    }

    /// Concatenated text of an element, trimmed.
    pub fn text(element: ElementRef<'_>) -> String {
        element.text().collect::<String>().trim().to_string()
    }
}

/// Elements under `element` matching `selector`.
pub fn select_within<'a>(element: ElementRef<'a>, selector: &str) -> ScrapeResult<Vec<ElementRef<'a>>> {
    let sel = parse_selector(selector)?;
    Ok(element.select(&sel).collect())
}

fn attr_matches(element: ElementRef<'_>, name: &str, value: &str) -> bool {
    match element.value().attr(name) {
        Some(actual) if name == "class" => {
            actual == value || actual.split_whitespace().any(|c| c == value)
        }
        Some(actual) => actual == value,
        None => false,
    }
}
