//! Enrichment settings and Source B credentials.
//!
//! Nothing here is process-global: the binary builds one `EnrichConfig` and
//! one `Credentials` and hands them to the `Enricher`.

use crate::error::{ScrapeError, ScrapeResult};
use secrecy::{ExposeSecret, SecretBox};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_NUMBER_CRITICS: usize = 2;
pub const DEFAULT_ACCURACY_THRESHOLD: f64 = 0.90;
pub const DEFAULT_YEAR_TOLERANCE: u32 = 1;

const IMDB_ROOT: &str = "https://www.imdb.com";
const IMDB_SIGNIN_URL: &str = "https://www.imdb.com/registration/signin?u=/";

/// Email/password pair for the IMDb sign-in form.
///
/// The password is kept in a `SecretBox` and only exposed when the form is
/// posted; `Debug` redacts it.
pub struct Credentials {
    pub email: String,
    password: SecretBox<str>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretBox::new(Box::from(password.into().as_str())),
        }
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Load `IMDB_EMAIL` / `IMDB_PASSWORD` from a dotenv file.
    ///
    /// `IMDB_PASS` is accepted as an alias for the password. A missing file
    /// is not an error: the process environment is consulted instead.
    pub fn from_env_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let path = path.as_ref();
        let mut vars: HashMap<String, String> = HashMap::new();

        match dotenvy::from_path_iter(path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) =
                        item.map_err(|e| ScrapeError::Config(format!("{}: {e}", path.display())))?;
                    vars.insert(key, value);
                }
            }
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "credentials file not found, using environment");
            }
            Err(e) => return Err(ScrapeError::Config(format!("{}: {e}", path.display()))),
        }

        let lookup = |key: &str| vars.get(key).cloned().or_else(|| std::env::var(key).ok());

        let email = lookup("IMDB_EMAIL")
            .ok_or_else(|| ScrapeError::Config("IMDB_EMAIL is not set".to_string()))?;
        let password = lookup("IMDB_PASSWORD")
            .or_else(|| lookup("IMDB_PASS"))
            .ok_or_else(|| ScrapeError::Config("IMDB_PASSWORD is not set".to_string()))?;

        Ok(Self::new(email, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// FilmAffinity edition to query. The edition decides the search root and
/// the label that introduces a critic's score inside an excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Region {
    /// English edition.
    #[default]
    En,
    /// Colombian (Spanish) edition.
    Co,
}

impl Region {
    pub fn filmaffinity_root(self) -> &'static str {
        match self {
            Region::En => "https://www.filmaffinity.com/en/",
            Region::Co => "https://www.filmaffinity.com/co/",
        }
    }

    pub fn rating_label(self) -> &'static str {
        match self {
            Region::En => "Rating",
            Region::Co => "Puntuación",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Maximum number of critic excerpts kept per movie.
    pub number_critics: usize,
    /// Base for Source A search URLs, ends with `/`.
    pub filmaffinity_root: String,
    /// Text after this label in a critic excerpt is dropped.
    pub rating_label: String,
    /// Scheme and host for Source B, no trailing `/`.
    pub imdb_root: String,
    pub imdb_signin_url: String,
    /// Allowed distance between requested and listed year when
    /// disambiguating Source A candidates.
    pub year_tolerance: u32,
    pub accuracy_threshold: f64,
    pub request_timeout: Duration,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

impl EnrichConfig {
    pub fn for_region(region: Region) -> Self {
        Self {
            number_critics: DEFAULT_NUMBER_CRITICS,
            filmaffinity_root: region.filmaffinity_root().to_string(),
            rating_label: region.rating_label().to_string(),
            imdb_root: IMDB_ROOT.to_string(),
            imdb_signin_url: IMDB_SIGNIN_URL.to_string(),
            year_tolerance: DEFAULT_YEAR_TOLERANCE,
            accuracy_threshold: DEFAULT_ACCURACY_THRESHOLD,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_number_critics(mut self, n: usize) -> Self {
        self.number_critics = n;
        self
    }

    pub fn with_filmaffinity_root(mut self, root: impl Into<String>) -> Self {
        self.filmaffinity_root = root.into();
        self
    }

    pub fn with_imdb_root(mut self, root: impl Into<String>) -> Self {
        self.imdb_root = root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_imdb_signin_url(mut self, url: impl Into<String>) -> Self {
        self.imdb_signin_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
