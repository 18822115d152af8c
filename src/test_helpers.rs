//! Scripted transport and recording page for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::Url;
use serde_json::Value;

use crate::error::ClientError;
use crate::page::Page;
use crate::transport::{ApiResponse, ApiTransport};

// =============================================================================
// MockTransport
// =============================================================================

/// One request the mock saw.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Scripted reply; `Err` simulates a transport failure.
pub type Scripted = Result<ApiResponse, String>;

pub struct MockTransport {
    replies: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self { replies: Mutex::new(replies.into()), seen: Mutex::new(Vec::new()) }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn next(&self, method: &'static str, url: &Url, body: Option<&Value>) -> Result<ApiResponse, ClientError> {
        self.seen.lock().unwrap().push(SeenRequest { method, url: url.to_string(), body: body.cloned() });
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ClientError::InvalidUrl(message)),
            None => Err(ClientError::InvalidUrl("no scripted reply".into())),
        }
    }
}

#[async_trait::async_trait]
impl ApiTransport for MockTransport {
    async fn get_json(&self, url: &Url) -> Result<ApiResponse, ClientError> {
        self.next("GET", url, None)
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<ApiResponse, ClientError> {
        self.next("POST", url, Some(body))
    }
}

pub fn ok(body: Value) -> Scripted {
    Ok(ApiResponse { status: 200, body })
}

pub fn status(status: u16, body: Value) -> Scripted {
    Ok(ApiResponse { status, body })
}

pub fn fail(message: &str) -> Scripted {
    Err(message.to_owned())
}

// =============================================================================
// RecordingPage
// =============================================================================

pub struct RecordingPage {
    page_id: String,
    navbar: bool,
    logout_control: bool,
    pub navbar_shown: Mutex<bool>,
    pub logout_wired: Mutex<bool>,
    pub navigations: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingPage {
    pub fn new(page_id: &str) -> Self {
        Self {
            page_id: page_id.to_owned(),
            navbar: true,
            logout_control: true,
            navbar_shown: Mutex::new(false),
            logout_wired: Mutex::new(false),
            navigations: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    /// Page markup without a navbar or logout control.
    pub fn bare(page_id: &str) -> Self {
        Self { navbar: false, logout_control: false, ..Self::new(page_id) }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn navbar_was_shown(&self) -> bool {
        *self.navbar_shown.lock().unwrap()
    }

    pub fn logout_was_wired(&self) -> bool {
        *self.logout_wired.lock().unwrap()
    }
}

impl Page for RecordingPage {
    fn page_id(&self) -> String {
        self.page_id.clone()
    }

    fn has_navbar(&self) -> bool {
        self.navbar
    }

    fn show_navbar(&self) {
        *self.navbar_shown.lock().unwrap() = true;
    }

    fn has_logout_control(&self) -> bool {
        self.logout_control
    }

    fn wire_logout(&self) {
        *self.logout_wired.lock().unwrap() = true;
    }

    fn navigate(&self, target: &str) {
        self.navigations.lock().unwrap().push(target.to_owned());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_owned());
    }
}
