//! Auth Panel: login / register / profile view states.
//!
//! The panel owns the visible view, the profile view model, and nothing
//! else. Storage goes through a [`TokenStore`], user-facing messages through
//! a [`Notifier`], and the network through a [`BackendClient`]. Every
//! backend call has a single failure boundary: it alerts once and leaves the
//! previously rendered state as it was.

pub mod profile;

use anyhow::Result;
use chrono::FixedOffset;

use crate::api::types::{Credentials, Registration};
use crate::api::{ApiError, BackendClient};
use crate::session::TokenStore;
use crate::utils::{log, time};
use profile::{ProfileView, StatsSummary};

/// Surfaces a message to the user and waits for acknowledgement.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// System clipboard capability.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    Register,
    Profile,
}

pub struct AuthPanel<S, N> {
    client: BackendClient,
    session: S,
    notifier: N,
    view: AuthView,
    profile: Option<ProfileView>,
    offset: FixedOffset,
}

impl<S: TokenStore, N: Notifier> AuthPanel<S, N> {
    /// A panel showing the login form, rendering times in the local offset.
    pub fn new(client: BackendClient, session: S, notifier: N) -> Self {
        Self {
            client,
            session,
            notifier,
            view: AuthView::Login,
            profile: None,
            offset: time::local_offset(),
        }
    }

    /// Render activity timestamps in `offset` instead of the local one.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn view(&self) -> AuthView {
        self.view
    }

    pub fn profile(&self) -> Option<&ProfileView> {
        self.profile.as_ref()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Swap between the login and registration forms.
    ///
    /// The profile view has no forms to swap, so it is left alone.
    pub fn toggle_forms(&mut self) -> AuthView {
        self.view = match self.view {
            AuthView::Login => AuthView::Register,
            AuthView::Register => AuthView::Login,
            AuthView::Profile => AuthView::Profile,
        };
        self.view
    }

    /// Page-load check: a stored token goes straight to the profile view,
    /// without asking the backend whether it is still valid.
    pub fn check_auth_status(&mut self) -> AuthView {
        if let Some(token) = self.session.get_token() {
            // Stats failures were already alerted; the view is Profile either way.
            let _ = self.show_profile(&token);
        }
        self.view
    }

    /// Submit credentials. On success the token replaces any stored one and
    /// the profile is shown.
    pub fn handle_login(&mut self, credentials: &Credentials) -> Result<(), ApiError> {
        log::info(&format!("login attempt for {}", credentials.username));

        let login = match self.client.login(credentials) {
            Ok(login) => login,
            Err(e) => {
                log::warn(&format!("login failed: {e}"));
                self.alert_failure(&e, "Login failed", "Login failed. Please try again.");
                return Err(e);
            }
        };

        if let Err(e) = self.session.set_token(&login.token) {
            log::error(&format!("failed to persist session token: {e:#}"));
            self.notifier
                .alert(&format!("Logged in, but the session could not be saved: {e}"));
        }

        // Stats failures are alerted by show_profile; the login itself succeeded.
        let _ = self.show_profile(&login.token);
        Ok(())
    }

    /// Submit a registration. On success, alert and return to the login form.
    pub fn handle_register(&mut self, registration: &Registration) -> Result<(), ApiError> {
        log::info(&format!("registration attempt for {}", registration.username));

        match self.client.register(registration) {
            Ok(_) => {
                self.notifier.alert("Registration successful! Please login.");
                self.toggle_forms();
                Ok(())
            }
            Err(e) => {
                log::warn(&format!("registration failed: {e}"));
                self.alert_failure(
                    &e,
                    "Registration failed",
                    "Registration failed. Please try again.",
                );
                Err(e)
            }
        }
    }

    /// Switch to the profile view, display `token`, and load user stats.
    ///
    /// The view switch and token display happen before the fetch, so a
    /// failed fetch still leaves the profile visible with whatever stats
    /// were shown before.
    pub fn show_profile(&mut self, token: &str) -> Result<(), ApiError> {
        self.view = AuthView::Profile;
        let previous = self.profile.take().and_then(|p| p.stats);
        self.profile = Some(ProfileView {
            token: token.to_string(),
            stats: previous,
        });

        log::debug("fetching user stats");
        match self.client.user_stats(token) {
            Ok(stats) => {
                let summary = StatsSummary::from_stats(&stats, &self.offset);
                if let Some(profile) = self.profile.as_mut() {
                    profile.stats = Some(summary);
                }
                Ok(())
            }
            Err(e @ ApiError::Application { .. }) => {
                log::warn(&format!("stats error: {e}"));
                let detail = e.server_message().unwrap_or("unknown error");
                self.notifier
                    .alert(&format!("Failed to load statistics: {detail}"));
                Err(e)
            }
            Err(e) => {
                log::warn(&format!("stats fetch error: {e}"));
                self.notifier.alert("Network error while loading statistics");
                Err(e)
            }
        }
    }

    /// Show the stored token in the profile view without loading stats.
    /// Stays on the current view when no token is stored.
    pub fn restore_session(&mut self) -> AuthView {
        if let Some(token) = self.session.get_token() {
            self.view = AuthView::Profile;
            self.profile = Some(ProfileView { token, stats: None });
        }
        self.view
    }

    /// Timer tick: reload the profile if a token is stored, otherwise do
    /// nothing.
    pub fn refresh_tick(&mut self) -> Option<Result<(), ApiError>> {
        let token = self.session.get_token()?;
        Some(self.show_profile(&token))
    }

    /// Copy the displayed token to the clipboard and confirm.
    pub fn copy_token(&self, clipboard: &impl Clipboard) -> Result<()> {
        let token = self
            .profile
            .as_ref()
            .map(|p| p.token.as_str())
            .unwrap_or_default();
        clipboard.copy(token)?;
        self.notifier.alert("Token copied to clipboard!");
        Ok(())
    }

    /// Clear the stored token and go back to the login form.
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear_token()?;
        self.profile = None;
        self.view = AuthView::Login;
        log::info("logged out");
        Ok(())
    }

    fn alert_failure(&self, error: &ApiError, fallback: &str, retry: &str) {
        match error {
            ApiError::Application { message, .. } => {
                self.notifier.alert(message.as_deref().unwrap_or(fallback));
            }
            _ => self.notifier.alert(retry),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::Arc;

    use super::*;
    use crate::api::{HttpRequest, HttpResponse, Transport};
    use crate::session::MemoryTokenStore;

    struct Unreachable;

    impl Transport for Unreachable {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct Alerts(RefCell<Vec<String>>);

    impl Notifier for &Alerts {
        fn alert(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn offline_panel<'a>(
        store: &'a MemoryTokenStore,
        alerts: &'a Alerts,
    ) -> AuthPanel<&'a MemoryTokenStore, &'a Alerts> {
        AuthPanel::new(BackendClient::new(Arc::new(Unreachable)), store, alerts)
            .with_offset(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn toggle_forms_flips_between_login_and_register() {
        let store = MemoryTokenStore::new();
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        assert_eq!(panel.view(), AuthView::Login);
        assert_eq!(panel.toggle_forms(), AuthView::Register);
        assert_eq!(panel.toggle_forms(), AuthView::Login);
    }

    #[test]
    fn toggle_forms_leaves_profile_alone() {
        let store = MemoryTokenStore::with_token("tok");
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);
        panel.check_auth_status();
        assert_eq!(panel.toggle_forms(), AuthView::Profile);
    }

    #[test]
    fn login_network_failure_shows_retry_message() {
        let store = MemoryTokenStore::new();
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        let creds = Credentials {
            username: "ada".to_string(),
            password: "pw".to_string(),
        };
        assert!(panel.handle_login(&creds).is_err());
        assert_eq!(
            alerts.0.borrow().as_slice(),
            ["Login failed. Please try again."]
        );
        assert_eq!(panel.view(), AuthView::Login);
        assert!(store.get_token().is_none());
    }

    #[test]
    fn stored_token_goes_to_profile_even_when_offline() {
        let store = MemoryTokenStore::with_token("tok");
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        assert_eq!(panel.check_auth_status(), AuthView::Profile);
        assert_eq!(panel.profile().unwrap().token, "tok");
        assert!(panel.profile().unwrap().stats.is_none());
        assert_eq!(
            alerts.0.borrow().as_slice(),
            ["Network error while loading statistics"]
        );
    }

    #[test]
    fn restore_session_shows_token_without_fetching() {
        let store = MemoryTokenStore::with_token("tok");
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        assert_eq!(panel.restore_session(), AuthView::Profile);
        assert_eq!(panel.profile().unwrap().token, "tok");
        assert!(panel.profile().unwrap().stats.is_none());
        assert!(alerts.0.borrow().is_empty());
    }

    #[test]
    fn restore_session_without_token_stays_on_login() {
        let store = MemoryTokenStore::new();
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        assert_eq!(panel.restore_session(), AuthView::Login);
        assert!(panel.profile().is_none());
    }

    #[test]
    fn refresh_tick_without_token_is_a_noop() {
        let store = MemoryTokenStore::new();
        let alerts = Alerts::default();
        let mut panel = offline_panel(&store, &alerts);

        assert!(panel.refresh_tick().is_none());
        assert!(alerts.0.borrow().is_empty());
    }
}
