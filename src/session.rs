//! Session gate — status check, page gating, logout.
//!
//! DESIGN
//! ======
//! The status check fails closed: any transport or decode failure reads as
//! "not authenticated" and never reaches the caller. Gating an
//! unauthenticated visitor off a protected page is a UX redirect only; the
//! backend is the authority on what a session may access.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::page::Page;
use crate::transport::ApiTransport;

pub const USER_STATUS_PATH: &str = "/api/user_status";
pub const LOGOUT_PATH: &str = "/logout";

/// Session state reported by `GET /api/user_status`.
///
/// Only `authenticated` is strict; the profile fields are informational and
/// read as absent when they carry an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub has_persona: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl SessionStatus {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }
}

/// What the gate did to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    /// Authenticated: navbar shown when present, logout control bound when present.
    Revealed { navbar_shown: bool, logout_wired: bool },
    /// Unauthenticated on a protected page: sent to the entry page.
    Redirected { to: String },
    /// Unauthenticated on a public page: left alone.
    Allowed,
}

/// Ask the backend whether this client holds an authenticated session.
pub async fn check_status(config: &ClientConfig, transport: &dyn ApiTransport) -> SessionStatus {
    let url = match config.request_url(USER_STATUS_PATH) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "session status URL invalid; treating as unauthenticated");
            return SessionStatus::unauthenticated();
        }
    };

    let response = match transport.get_json(&url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, %url, "session status check failed; treating as unauthenticated");
            return SessionStatus::unauthenticated();
        }
    };

    match serde_json::from_value::<SessionStatus>(response.body) {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, status = response.status, "session status malformed; treating as unauthenticated");
            SessionStatus::unauthenticated()
        }
    }
}

/// Adjust `page` for a resolved session `status`.
pub fn apply(config: &ClientConfig, status: &SessionStatus, page: &dyn Page) -> GateOutcome {
    if status.authenticated {
        let navbar_shown = page.has_navbar();
        if navbar_shown {
            page.show_navbar();
        }
        let logout_wired = page.has_logout_control();
        if logout_wired {
            page.wire_logout();
        }
        return GateOutcome::Revealed { navbar_shown, logout_wired };
    }

    let current = page.page_id();
    if config.is_protected(&current) {
        tracing::info!(page = %current, to = %config.entry_page, "unauthenticated visit to protected page");
        page.navigate(&config.entry_page);
        return GateOutcome::Redirected { to: config.entry_page.clone() };
    }

    GateOutcome::Allowed
}

/// End the session and return to the entry page.
///
/// The redirect happens whether or not the logout request succeeds.
pub async fn logout(config: &ClientConfig, transport: &dyn ApiTransport, page: &dyn Page) {
    match config.request_url(LOGOUT_PATH) {
        Ok(url) => match transport.get_json(&url).await {
            Ok(response) => tracing::info!(status = response.status, "logged out"),
            Err(e) => tracing::warn!(error = %e, "logout request failed"),
        },
        Err(e) => tracing::warn!(error = %e, "logout URL invalid"),
    }
    page.navigate(&config.entry_page);
}

// =============================================================================
// GATE
// =============================================================================

/// Session gate bound to one config and transport.
pub struct SessionGate<'a> {
    config: &'a ClientConfig,
    transport: &'a dyn ApiTransport,
}

impl<'a> SessionGate<'a> {
    #[must_use]
    pub fn new(config: &'a ClientConfig, transport: &'a dyn ApiTransport) -> Self {
        Self { config, transport }
    }

    pub async fn check_status(&self) -> SessionStatus {
        check_status(self.config, self.transport).await
    }

    /// Check the session and gate `page` on the result.
    pub async fn guard(&self, page: &dyn Page) -> GateOutcome {
        let status = self.check_status().await;
        apply(self.config, &status, page)
    }

    pub async fn logout(&self, page: &dyn Page) {
        logout(self.config, self.transport, page).await;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
