use std::sync::Arc;

use reqwest::Url;
use serde_json::json;
use tokio::sync::Notify;

use super::*;
use crate::test_helpers::{MockTransport, RecordingPage, fail, ok, status};
use crate::transport::ApiResponse;

fn local_config() -> ClientConfig {
    ClientConfig::new("http://localhost:5500/index.html", None).unwrap()
}

fn credentials() -> FormFields {
    FormFields::new().with("username", "ada").with("password", "hunter2")
}

// =============================================================================
// FormFields
// =============================================================================

#[test]
fn payload_skips_unnamed_fields() {
    let fields = FormFields::new().with("username", "ada").with("", "submit");
    assert_eq!(fields.to_payload(), json!({ "username": "ada" }));
}

#[test]
fn payload_repeated_name_keeps_last_value() {
    let fields = FormFields::new().with("role", "a").with("role", "b");
    assert_eq!(fields.to_payload(), json!({ "role": "b" }));
}

#[test]
fn form_kind_paths() {
    assert_eq!(FormKind::Login.path(), "/login");
    assert_eq!(FormKind::Signup.path(), "/signup");
}

// =============================================================================
// submit
// =============================================================================

#[tokio::test]
async fn login_success_navigates_to_redirect() {
    let config = local_config();
    let transport = MockTransport::new(vec![ok(json!({
        "success": true,
        "message": "Login successful.",
        "redirect": "hub.html"
    }))]);
    let page = RecordingPage::new("index.html");

    let outcome = FormSubmitter::login(&config, &transport).submit(&credentials(), &page).await;
    assert_eq!(outcome, SubmitOutcome::Navigated("hub.html".into()));
    assert_eq!(page.navigations(), vec!["hub.html".to_owned()]);
    assert!(page.alerts().is_empty());

    let seen = transport.seen();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "http://localhost:5000/login");
    assert_eq!(seen[0].body, Some(json!({ "username": "ada", "password": "hunter2" })));
}

#[tokio::test]
async fn login_rejection_alerts_exact_message() {
    let config = local_config();
    let transport = MockTransport::new(vec![status(401, json!({ "success": false, "message": "bad password" }))]);
    let page = RecordingPage::new("index.html");

    let outcome = FormSubmitter::login(&config, &transport).submit(&credentials(), &page).await;
    assert_eq!(outcome, SubmitOutcome::Rejected("bad password".into()));
    assert_eq!(page.alerts(), vec!["bad password".to_owned()]);
    assert!(page.navigations().is_empty());
}

#[tokio::test]
async fn rejection_without_message_uses_fallback() {
    let config = local_config();
    let transport = MockTransport::new(vec![ok(json!({ "success": false }))]);
    let page = RecordingPage::new("index.html");

    let outcome = FormSubmitter::signup(&config, &transport).submit(&credentials(), &page).await;
    assert_eq!(outcome, SubmitOutcome::Rejected(REJECTED_FALLBACK_MESSAGE.into()));
    assert_eq!(transport.seen()[0].url, "http://localhost:5000/signup");
}

#[tokio::test]
async fn success_without_redirect_stays_put() {
    let config = local_config();
    let transport = MockTransport::new(vec![ok(json!({ "success": true }))]);
    let page = RecordingPage::new("index.html");

    let outcome = FormSubmitter::login(&config, &transport).submit(&credentials(), &page).await;
    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert!(page.navigations().is_empty());
    assert!(page.alerts().is_empty());
}

#[tokio::test]
async fn transport_failure_alerts_and_form_stays_usable() {
    let config = local_config();
    let transport = MockTransport::new(vec![
        fail("connection refused"),
        ok(json!({ "success": true, "redirect": "persona.html" })),
    ]);
    let page = RecordingPage::new("index.html");
    let submitter = FormSubmitter::signup(&config, &transport);

    let first = submitter.submit(&credentials(), &page).await;
    assert!(matches!(first, SubmitOutcome::Failed(ref detail) if detail.contains("connection refused")));
    assert_eq!(page.alerts(), vec![TRANSPORT_FAILURE_MESSAGE.to_owned()]);
    assert!(!submitter.is_pending());

    let second = submitter.submit(&credentials(), &page).await;
    assert_eq!(second, SubmitOutcome::Navigated("persona.html".into()));
}

#[tokio::test]
async fn non_object_reply_is_failure() {
    let config = local_config();
    let transport = MockTransport::new(vec![ok(json!("<html>oops</html>"))]);
    let page = RecordingPage::new("index.html");

    let outcome = FormSubmitter::login(&config, &transport).submit(&credentials(), &page).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(page.alerts(), vec![TRANSPORT_FAILURE_MESSAGE.to_owned()]);
}

// =============================================================================
// in-flight guard
// =============================================================================

/// Transport that holds every request until released.
struct HeldTransport {
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl ApiTransport for HeldTransport {
    async fn get_json(&self, _url: &Url) -> Result<ApiResponse, ClientError> {
        self.release.notified().await;
        Ok(ApiResponse { status: 200, body: json!({}) })
    }

    async fn post_json(&self, _url: &Url, _body: &Value) -> Result<ApiResponse, ClientError> {
        self.release.notified().await;
        Ok(ApiResponse { status: 200, body: json!({ "success": true, "redirect": "hub.html" }) })
    }
}

#[tokio::test]
async fn duplicate_submit_while_pending_is_ignored() {
    let config = local_config();
    let release = Arc::new(Notify::new());
    let transport = HeldTransport { release: Arc::clone(&release) };
    let page = RecordingPage::new("index.html");
    let submitter = FormSubmitter::login(&config, &transport);
    let fields = credentials();

    let (first, second, ()) = tokio::join!(submitter.submit(&fields, &page), submitter.submit(&fields, &page), async {
        release.notify_one();
    });

    let mut outcomes = vec![first, second];
    outcomes.sort_by_key(|o| matches!(o, SubmitOutcome::Ignored));
    assert_eq!(outcomes, vec![SubmitOutcome::Navigated("hub.html".into()), SubmitOutcome::Ignored]);
    assert_eq!(page.navigations(), vec!["hub.html".to_owned()]);
    assert!(!submitter.is_pending());
}
