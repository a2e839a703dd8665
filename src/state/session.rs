//! Auth-session state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Session` writes the credential. Every path that changes it updates the
//! persisted copy, the in-memory copy, and the API client's default header
//! together. The one other writer is the forced-login response stage, which
//! revokes the client credential; the session listens for that and logs
//! itself out. Route guards and views read the reactive [`SessionState`]
//! signal.
//!
//! Operations capture the state epoch when they start. A response that
//! arrives after a newer operation (or a logout) has bumped the epoch is
//! dropped instead of overwriting fresher state.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;

use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::util::storage::{CredentialStore, TOKEN_KEY};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed";
pub const PROFILE_FAILED: &str = "Could not verify session";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped by every operation that supersedes in-flight ones.
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    /// Credential restored from storage, profile fetch in flight.
    Restoring,
    Authenticated,
    /// Credential held but the profile could not be confirmed.
    Unverified,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.token, &self.user) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), Some(_)) => SessionPhase::Authenticated,
            (Some(_), None) if self.loading => SessionPhase::Restoring,
            (Some(_), None) => SessionPhase::Unverified,
        }
    }
}

/// Start a login/register attempt; returns the epoch it owns.
pub(crate) fn begin_attempt(state: &mut SessionState) -> u64 {
    state.epoch += 1;
    state.loading = true;
    state.error = None;
    state.epoch
}

pub(crate) fn apply_established(state: &mut SessionState, auth: AuthResponse) {
    state.token = Some(auth.token);
    state.user = Some(auth.user);
    state.loading = false;
    state.error = None;
}

pub(crate) fn apply_attempt_failed(state: &mut SessionState, message: String) {
    state.loading = false;
    state.error = Some(message);
}

pub(crate) fn apply_restored(state: &mut SessionState, token: String) {
    state.token = Some(token);
    state.user = None;
    state.loading = true;
}

pub(crate) fn apply_profile(state: &mut SessionState, user: User) {
    state.user = Some(user);
    state.loading = false;
}

pub(crate) fn apply_logout(state: &mut SessionState) {
    state.epoch += 1;
    state.token = None;
    state.user = None;
    state.loading = false;
}

/// Session container provided through context. Cheap to clone; clones share
/// the same signal, client, and store.
#[derive(Clone)]
pub struct Session {
    state: RwSignal<SessionState>,
    client: Arc<ApiClient>,
    store: Arc<dyn CredentialStore>,
}

impl Session {
    /// The session ends whenever the client revokes its credential, so the
    /// signal never outlives the stored copy.
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
        let state = RwSignal::new(SessionState::default());
        client.on_credential_invalidated(move || {
            leptos::logging::log!("credential revoked, ending session");
            state.update(apply_logout);
        });
        Self { state, client, store }
    }

    /// Reactive state for views and guards.
    #[must_use]
    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(SessionState::is_authenticated)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.state.with_untracked(|s| s.epoch == epoch)
    }

    /// Exchange credentials for a session. Returns `true` on success; on
    /// failure the reason is left in `error`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.establish(api::LOGIN, &LoginRequest { email, password }, LOGIN_FAILED).await
    }

    /// Create an account and sign in. Same contract as [`Session::login`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> bool {
        self.establish(api::REGISTER, &RegisterRequest { username, email, password }, REGISTER_FAILED)
            .await
    }

    async fn establish<B: Serialize>(&self, path: &str, body: &B, default_error: &str) -> bool {
        let mut epoch = 0;
        self.state.update(|s| epoch = begin_attempt(s));

        let outcome = self.client.post_json::<_, AuthResponse>(path, body).await;
        if !self.is_current(epoch) {
            leptos::logging::log!("discarding superseded response from {path}");
            return false;
        }

        match outcome.and_then(|auth| self.persist(&auth.token).map(|()| auth)) {
            Ok(auth) => {
                leptos::logging::log!("session established for {}", auth.user.username);
                self.state.update(|s| apply_established(s, auth));
                true
            }
            Err(err) => {
                leptos::logging::warn!("{path} failed: {err}");
                let message = err.user_message(default_error);
                self.state.update(|s| apply_attempt_failed(s, message));
                false
            }
        }
    }

    fn persist(&self, token: &str) -> Result<(), ApiError> {
        self.store.set(TOKEN_KEY, token)?;
        self.client.set_default_credential(token);
        Ok(())
    }

    /// Refresh the profile for the held credential. Does nothing when
    /// anonymous. Only an auth failure ends the session; other failures keep
    /// the credential and record the error.
    pub async fn fetch_user(&self) {
        let Some(epoch) = self.state.with_untracked(|s| s.token.is_some().then_some(s.epoch)) else {
            return;
        };

        let outcome = self.client.get_json::<User>(api::CURRENT_USER).await;
        if !self.is_current(epoch) {
            leptos::logging::log!("discarding superseded profile response");
            return;
        }

        match outcome {
            Ok(user) => self.state.update(|s| apply_profile(s, user)),
            Err(err @ ApiError::Auth { .. }) => {
                leptos::logging::warn!("profile fetch rejected, ending session: {err}");
                self.logout();
            }
            Err(err @ (ApiError::Network { .. } | ApiError::Validation { .. } | ApiError::Storage { .. })) => {
                leptos::logging::warn!("profile fetch failed, keeping credential: {err}");
                let message = err.user_message(PROFILE_FAILED);
                self.state.update(|s| apply_attempt_failed(s, message));
            }
        }
    }

    /// End the session. Safe to call when already anonymous.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            leptos::logging::warn!("could not remove stored credential: {e}");
        }
        self.client.clear_default_credential();
        self.state.update(apply_logout);
    }

    /// Restore a persisted credential at startup and validate it.
    pub async fn init_auth(&self) {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return,
            Err(e) => {
                leptos::logging::warn!("could not read stored credential: {e}");
                let message = ApiError::from(e).user_message(PROFILE_FAILED);
                self.state.update(|s| s.error = Some(message));
                return;
            }
        };

        self.client.set_default_credential(&token);
        self.state.update(|s| apply_restored(s, token));
        leptos::logging::log!("session restored from storage");
        self.fetch_user().await;
    }
}
