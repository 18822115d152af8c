//! Client configuration parsed from environment variables.
//!
//! Built once at startup and passed by reference to every consumer; the
//! resolved API base URL never changes for the lifetime of a config.

use reqwest::Url;

use crate::endpoint::{self, Resolution};
use crate::error::{ClientError, ConfigError};

pub const DEFAULT_PAGE_URL: &str = "http://localhost:5500/index.html";
pub const DEFAULT_ENTRY_PAGE: &str = "index.html";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Pages an unauthenticated visitor is bounced away from. UX only; the
/// backend remains the authority on what a session may access.
pub const DEFAULT_PROTECTED_PAGES: &[&str] = &[
    "hub.html",
    "persona.html",
    "roadmap.html",
    "quiz_setup.html",
    "quiz.html",
    "puzzle.html",
    "game_dashboard.html",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub page_url: Url,
    pub resolution: Resolution,
    pub entry_page: String,
    pub protected_pages: Vec<String>,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build config from the page URL and an optional base URL override,
    /// with default entry page, protected pages and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_url` does not parse or has no host.
    pub fn new(page_url: &str, api_base_override: Option<&str>) -> Result<Self, ConfigError> {
        let page_url = parse_page_url(page_url)?;
        let host = page_url.host_str().unwrap_or_default();
        let resolution = endpoint::resolve(host, api_base_override);

        Ok(Self {
            page_url,
            resolution,
            entry_page: DEFAULT_ENTRY_PAGE.to_owned(),
            protected_pages: DEFAULT_PROTECTED_PAGES.iter().map(|&page| page.to_owned()).collect(),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed config from process environment variables.
    ///
    /// Optional:
    /// - `GATEPASS_PAGE_URL`: current page, default `http://localhost:5500/index.html`
    /// - `API_BASE_URL`: base URL override injected at build/deploy time
    /// - `GATEPASS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `GATEPASS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the page URL or a timeout value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page URL or a timeout value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_url = lookup("GATEPASS_PAGE_URL").unwrap_or_else(|| DEFAULT_PAGE_URL.to_owned());
        let api_base_override = lookup("API_BASE_URL");

        let mut config = Self::new(&page_url, api_base_override.as_deref())?;
        config.timeouts = Timeouts {
            request_secs: parse_u64(
                "GATEPASS_REQUEST_TIMEOUT_SECS",
                lookup("GATEPASS_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_u64(
                "GATEPASS_CONNECT_TIMEOUT_SECS",
                lookup("GATEPASS_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };
        Ok(config)
    }

    /// Resolved API base URL; empty for same-origin requests.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.resolution.base_url
    }

    /// Absolute URL for an API `path` such as `/login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn request_url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = if self.api_base_url().is_empty() {
            format!("{}{path}", self.page_url.origin().ascii_serialization())
        } else {
            format!("{}{path}", self.api_base_url())
        };
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Identifier of the current page (last path segment).
    #[must_use]
    pub fn current_page_id(&self) -> String {
        page_id(&self.page_url).unwrap_or_else(|| self.entry_page.clone())
    }

    #[must_use]
    pub fn is_protected(&self, page: &str) -> bool {
        self.protected_pages.iter().any(|p| p == page)
    }

    /// Copy of this config pointing at another page on the same site.
    /// The base URL resolution is carried over, not recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` cannot be joined onto the current page URL.
    pub fn with_page(&self, target: &str) -> Result<Self, ConfigError> {
        let page_url = self.page_url.join(target).map_err(|e| ConfigError::InvalidPageUrl {
            url: target.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { page_url, ..self.clone() })
    }
}

fn parse_page_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidPageUrl { url: raw.to_owned(), reason: e.to_string() })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidPageUrl { url: raw.to_owned(), reason: "missing host".to_owned() });
    }
    Ok(url)
}

fn page_id(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(Iterator::last)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_u64(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: value.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
