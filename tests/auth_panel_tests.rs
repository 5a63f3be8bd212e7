/// Auth Panel tests against a scripted backend.
///
/// Cover the login / register / profile flows, the alert text of each
/// failure class, and session persistence across panel instances.
mod common;

use common::{RecordingNotifier, Reply, ScriptedTransport, utc};
use facewatch::api::Method;
use facewatch::api::types::{Credentials, Registration};
use facewatch::auth::profile::render_profile;
use facewatch::auth::{AuthPanel, AuthView, Clipboard};
use facewatch::session::{FileTokenStore, MemoryTokenStore, TokenStore};

const STATS: &str = r#"{
    "total_comparisons": 10,
    "successful": 7,
    "unsuccessful": 3,
    "recent_activity": [
        {"timestamp": "2024-03-01T10:15:00", "match_result": true, "confidence": 92.4},
        {"timestamp": "2024-03-01T09:00:00", "match_result": false, "confidence": 41.0}
    ]
}"#;

fn creds(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn registration() -> Registration {
    Registration {
        username: "ada".to_string(),
        password: "pw".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        purpose: "identity verification".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_success_stores_token_and_shows_profile() {
    let backend = ScriptedTransport::new();
    backend
        .on(Method::Post, "/auth/login", Reply::ok(r#"{"token": "tok-123"}"#))
        .on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts).with_offset(utc());

    panel.handle_login(&creds("ada", "pw")).unwrap();

    assert_eq!(panel.view(), AuthView::Profile);
    assert_eq!(store.get_token().as_deref(), Some("tok-123"));
    assert!(alerts.messages().is_empty());

    let text = render_profile(panel.profile().unwrap());
    assert!(text.contains("Token: tok-123"));
    assert!(text.contains("Success rate:      70.0%"));
    assert!(text.contains("2024-03-01 10:15:00  Match (92.4%)"));
    assert!(text.contains("2024-03-01 09:00:00  No Match (41.0%)"));
}

#[test]
fn login_sends_credentials_as_json() {
    let backend = ScriptedTransport::new();
    backend
        .on(Method::Post, "/auth/login", Reply::ok(r#"{"token": "t"}"#))
        .on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    panel.handle_login(&creds("ada", "s3cret")).unwrap();

    let login = &backend.calls()[0];
    let body: Credentials = serde_json::from_str(login.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, creds("ada", "s3cret"));
}

#[test]
fn login_rejection_alerts_server_message() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Post,
        "/auth/login",
        Reply::error(401, r#"{"error": "bad credentials"}"#),
    );
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    let err = panel.handle_login(&creds("ada", "wrong")).unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(alerts.messages(), ["bad credentials"]);
    assert_eq!(panel.view(), AuthView::Login);
    assert!(store.get_token().is_none());
    assert_eq!(backend.calls_to("/user/stats"), 0);
}

#[test]
fn login_rejection_without_message_uses_fallback() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Post, "/auth/login", Reply::error(400, "{}"));
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert!(panel.handle_login(&creds("ada", "pw")).is_err());
    assert_eq!(alerts.messages(), ["Login failed"]);
}

#[test]
fn login_with_non_json_error_page_shows_retry_message() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Post,
        "/auth/login",
        Reply::error(502, "<html>Bad Gateway</html>"),
    );
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert!(panel.handle_login(&creds("ada", "pw")).is_err());
    assert_eq!(alerts.messages(), ["Login failed. Please try again."]);
}

#[test]
fn login_replaces_previous_token() {
    let backend = ScriptedTransport::new();
    backend
        .on(Method::Post, "/auth/login", Reply::ok(r#"{"token": "new"}"#))
        .on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::with_token("old");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    panel.handle_login(&creds("ada", "pw")).unwrap();
    assert_eq!(store.get_token().as_deref(), Some("new"));
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[test]
fn register_success_returns_to_login_form() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Post,
        "/auth/register",
        Reply::ok(r#"{"message": "User registered successfully"}"#),
    );
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);
    panel.toggle_forms();
    assert_eq!(panel.view(), AuthView::Register);

    panel.handle_register(&registration()).unwrap();

    assert_eq!(panel.view(), AuthView::Login);
    assert_eq!(alerts.messages(), ["Registration successful! Please login."]);
    assert!(store.get_token().is_none());

    let sent: Registration =
        serde_json::from_str(backend.calls()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, registration());
}

#[test]
fn register_conflict_stays_on_form() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Post,
        "/auth/register",
        Reply::error(409, r#"{"error": "Username already exists"}"#),
    );
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);
    panel.toggle_forms();

    assert!(panel.handle_register(&registration()).is_err());
    assert_eq!(panel.view(), AuthView::Register);
    assert_eq!(alerts.messages(), ["Username already exists"]);
}

#[test]
fn register_network_failure_shows_retry_message() {
    let backend = ScriptedTransport::new();
    let store = MemoryTokenStore::new();
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert!(panel.handle_register(&registration()).is_err());
    assert_eq!(alerts.messages(), ["Registration failed. Please try again."]);
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[test]
fn stats_request_sends_raw_token_header() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::with_token("abc.def");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert_eq!(panel.check_auth_status(), AuthView::Profile);

    let call = &backend.calls()[0];
    assert_eq!(call.method, Method::Get);
    assert_eq!(call.header("Authorization"), Some("abc.def"));
}

#[test]
fn stats_failure_keeps_previous_stats() {
    let backend = ScriptedTransport::new();
    backend
        .on(Method::Get, "/user/stats", Reply::ok(STATS))
        .on(
            Method::Get,
            "/user/stats",
            Reply::error(401, r#"{"error": "Token has expired"}"#),
        );
    let store = MemoryTokenStore::with_token("tok");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts).with_offset(utc());

    panel.refresh_tick().unwrap().unwrap();
    let before = panel.profile().unwrap().stats.clone();
    assert!(before.is_some());

    assert!(panel.refresh_tick().unwrap().is_err());
    assert_eq!(panel.view(), AuthView::Profile);
    assert_eq!(panel.profile().unwrap().stats, before);
    assert_eq!(alerts.messages(), ["Failed to load statistics: Token has expired"]);
}

#[test]
fn stats_error_without_message_reads_unknown_error() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Get, "/user/stats", Reply::error(500, "{}"));
    let store = MemoryTokenStore::with_token("tok");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    panel.check_auth_status();
    assert_eq!(alerts.messages(), ["Failed to load statistics: unknown error"]);
}

#[test]
fn zero_comparisons_render_zero_rate() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Get,
        "/user/stats",
        Reply::ok(r#"{"total_comparisons": 0, "successful": 0, "unsuccessful": 0, "recent_activity": []}"#),
    );
    let store = MemoryTokenStore::with_token("tok");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    panel.check_auth_status();
    let text = render_profile(panel.profile().unwrap());
    assert!(text.contains("Success rate:      0.0%"));
    assert!(text.contains("No recent activity"));
}

#[test]
fn null_stats_render_as_zero() {
    let backend = ScriptedTransport::new();
    backend.on(
        Method::Get,
        "/user/stats",
        Reply::ok(r#"{"total_comparisons": null, "successful": null, "unsuccessful": null, "recent_activity": null}"#),
    );
    let store = MemoryTokenStore::with_token("tok");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    panel.check_auth_status();
    assert!(alerts.messages().is_empty());
    let text = render_profile(panel.profile().unwrap());
    assert!(text.contains("Success rate:      0.0%"));
    assert!(text.contains("No recent activity"));
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[test]
fn logout_then_fresh_panel_shows_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let backend = ScriptedTransport::new();
    backend
        .on(Method::Post, "/auth/login", Reply::ok(r#"{"token": "tok"}"#))
        .on(Method::Get, "/user/stats", Reply::ok(STATS));
    let alerts = RecordingNotifier::default();

    let mut first = AuthPanel::new(backend.client(), FileTokenStore::new(&path), &alerts);
    first.handle_login(&creds("ada", "pw")).unwrap();
    assert!(path.exists());

    // A later invocation restores the session from disk.
    let mut second = AuthPanel::new(backend.client(), FileTokenStore::new(&path), &alerts);
    assert_eq!(second.check_auth_status(), AuthView::Profile);
    second.logout().unwrap();
    assert_eq!(second.view(), AuthView::Login);
    assert!(second.profile().is_none());

    let mut third = AuthPanel::new(backend.client(), FileTokenStore::new(&path), &alerts);
    assert_eq!(third.check_auth_status(), AuthView::Login);
}

#[test]
fn refresh_tick_stops_after_logout() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::with_token("tok");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert!(panel.refresh_tick().is_some());
    panel.logout().unwrap();
    assert!(panel.refresh_tick().is_none());
    assert_eq!(backend.calls_to("/user/stats"), 1);
}

struct FakeClipboard(std::cell::RefCell<Option<String>>);

impl Clipboard for FakeClipboard {
    fn copy(&self, text: &str) -> anyhow::Result<()> {
        *self.0.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[test]
fn copy_token_copies_displayed_token() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Get, "/user/stats", Reply::ok(STATS));
    let store = MemoryTokenStore::with_token("tok-xyz");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);
    panel.check_auth_status();

    let clipboard = FakeClipboard(Default::default());
    panel.copy_token(&clipboard).unwrap();

    assert_eq!(clipboard.0.borrow().as_deref(), Some("tok-xyz"));
    assert_eq!(alerts.messages(), ["Token copied to clipboard!"]);
}

#[test]
fn restored_session_copies_token_without_loading_stats() {
    let backend = ScriptedTransport::new();
    backend.on(Method::Get, "/user/stats", Reply::Unreachable);
    let store = MemoryTokenStore::with_token("tok-xyz");
    let alerts = RecordingNotifier::default();
    let mut panel = AuthPanel::new(backend.client(), &store, &alerts);

    assert_eq!(panel.restore_session(), AuthView::Profile);
    let clipboard = FakeClipboard(Default::default());
    panel.copy_token(&clipboard).unwrap();

    assert_eq!(clipboard.0.borrow().as_deref(), Some("tok-xyz"));
    assert_eq!(backend.calls_to("/user/stats"), 0);
    assert_eq!(alerts.messages(), ["Token copied to clipboard!"]);
}
