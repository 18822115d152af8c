//! Login and signup form submission.
//!
//! DESIGN
//! ======
//! A submission posts the form's named fields as JSON and acts on the
//! `{success, redirect | message}` reply: navigate on success, alert the
//! backend's message on rejection. A transport failure alerts a generic
//! notice and leaves the form usable; nothing is retried automatically.
//!
//! Each submitter carries an in-flight flag so a double submit does not
//! issue a second request while the first is pending.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::page::Page;
use crate::transport::ApiTransport;

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Unable to reach the server. Please try again.";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Request failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Signup,
}

impl FormKind {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

/// Named form fields in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// JSON payload of every named field. Unnamed fields are skipped; a
    /// repeated name keeps the last value.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            if name.is_empty() {
                continue;
            }
            map.insert(name.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }
}

/// Backend reply to a form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Accepted; the page navigated to the backend's redirect target.
    Navigated(String),
    /// Accepted without a redirect target; the page stays put.
    Succeeded,
    /// Rejected; the message was alerted to the user.
    Rejected(String),
    /// Transport or decode failure; a generic notice was alerted.
    Failed(String),
    /// A submission from this form was already in flight.
    Ignored,
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// SUBMITTER
// =============================================================================

pub struct FormSubmitter<'a> {
    kind: FormKind,
    config: &'a ClientConfig,
    transport: &'a dyn ApiTransport,
    in_flight: AtomicBool,
}

impl<'a> FormSubmitter<'a> {
    #[must_use]
    pub fn new(kind: FormKind, config: &'a ClientConfig, transport: &'a dyn ApiTransport) -> Self {
        Self { kind, config, transport, in_flight: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn login(config: &'a ClientConfig, transport: &'a dyn ApiTransport) -> Self {
        Self::new(FormKind::Login, config, transport)
    }

    #[must_use]
    pub fn signup(config: &'a ClientConfig, transport: &'a dyn ApiTransport) -> Self {
        Self::new(FormKind::Signup, config, transport)
    }

    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `fields` and drive `page` from the reply.
    pub async fn submit(&self, fields: &FormFields, page: &dyn Page) -> SubmitOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!(form = self.kind.label(), "submission already in flight; ignoring");
            return SubmitOutcome::Ignored;
        };

        let reply = match self.send(fields).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(form = self.kind.label(), error = %e, "form submission failed");
                page.alert(TRANSPORT_FAILURE_MESSAGE);
                return SubmitOutcome::Failed(e.to_string());
            }
        };

        if !reply.success {
            let message = reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_owned());
            tracing::info!(form = self.kind.label(), reason = %message, "form rejected");
            page.alert(&message);
            return SubmitOutcome::Rejected(message);
        }

        match reply.redirect.filter(|r| !r.is_empty()) {
            Some(target) => {
                tracing::info!(form = self.kind.label(), %target, "form accepted");
                page.navigate(&target);
                SubmitOutcome::Navigated(target)
            }
            None => {
                tracing::warn!(form = self.kind.label(), "form accepted without redirect target");
                SubmitOutcome::Succeeded
            }
        }
    }

    async fn send(&self, fields: &FormFields) -> Result<FormReply, ClientError> {
        let url = self.config.request_url(self.kind.path())?;
        let response = self.transport.post_json(&url, &fields.to_payload()).await?;
        Ok(serde_json::from_value::<FormReply>(response.body)?)
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
