//! Endpoint resolution — which base URL every API call targets.
//!
//! DESIGN
//! ======
//! The base URL is a pure function of the page hostname and an override
//! string injected by the build/hosting environment. An override pointing at
//! a loopback address is only honored when the page itself runs on loopback,
//! so a misconfigured production deploy falls back to same-origin requests
//! instead of calling into a developer machine.

use serde::Serialize;

pub const LOCAL_DEFAULT_BASE_URL: &str = "http://localhost:5000";

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Where a resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Override,
    LocalDefault,
    SameOrigin,
}

/// Result of endpoint resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Base URL prefix; empty means same-origin relative requests.
    pub base_url: String,
    pub source: ResolutionSource,
    /// Override value rejected as a loopback address on a remote page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded_override: Option<String>,
}

#[must_use]
pub fn is_loopback_host(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
}

fn mentions_loopback(value: &str) -> bool {
    LOOPBACK_HOSTS.iter().any(|host| value.contains(host))
}

/// Resolve the API base URL for a page served from `hostname`.
#[must_use]
pub fn resolve(hostname: &str, override_url: Option<&str>) -> Resolution {
    let local = is_loopback_host(hostname);
    let mut discarded_override = None;

    let override_url = override_url.map(str::trim).filter(|value| !value.is_empty());
    let override_url = match override_url {
        Some(value) if !local && mentions_loopback(value) => {
            tracing::warn!(
                hostname,
                override_url = value,
                "ignoring loopback API base URL on a non-local page"
            );
            discarded_override = Some(value.to_owned());
            None
        }
        other => other,
    };

    let (base_url, source) = match override_url {
        Some(value) => (value.trim_end_matches('/').to_owned(), ResolutionSource::Override),
        None if local => (LOCAL_DEFAULT_BASE_URL.to_owned(), ResolutionSource::LocalDefault),
        None => (String::new(), ResolutionSource::SameOrigin),
    };

    Resolution { base_url, source, discarded_override }
}

/// String-only form of [`resolve`].
#[must_use]
pub fn resolve_api_base_url(hostname: &str, override_url: Option<&str>) -> String {
    resolve(hostname, override_url).base_url
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
