//! Ordered request/response stages wrapped around the transport.
//!
//! ARCHITECTURE
//! ============
//! A pipeline is two named, ordered stage lists. Request stages run
//! synchronously before the transport and may rewrite the request or reject
//! it. Response stages run synchronously after it, see every outcome, and
//! may react (clear the credential, redirect) but always return an outcome
//! for the next stage. No stage touches the network, so each one is tested
//! on its own.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::net::error::ApiError;
use crate::net::policy::{CredentialPolicy, UnauthorizedPolicy, policy_for};
use crate::net::transport::{AUTHORIZATION, ApiRequest, ApiResponse};
use crate::routes::LOGIN_PATH;
use crate::util::navigation::Navigator;
use crate::util::storage::{CredentialStore, TOKEN_KEY};

pub type Outcome = Result<ApiResponse, ApiError>;

pub type RequestStage = Box<dyn Fn(&mut ApiRequest) -> Result<(), ApiError> + Send + Sync>;
pub type ResponseStage = Box<dyn Fn(&ApiRequest, Outcome) -> Outcome + Send + Sync>;

pub const ATTACH_CREDENTIAL: &str = "attach-credential";
pub const INVALIDATE_ON_UNAUTHORIZED: &str = "invalidate-on-unauthorized";

#[derive(Default)]
pub struct RequestPipeline {
    request_stages: Vec<(&'static str, RequestStage)>,
    response_stages: Vec<(&'static str, ResponseStage)>,
}

impl RequestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_request_stage<F>(mut self, name: &'static str, stage: F) -> Self
    where
        F: Fn(&mut ApiRequest) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.request_stages.push((name, Box::new(stage)));
        self
    }

    #[must_use]
    pub fn with_response_stage<F>(mut self, name: &'static str, stage: F) -> Self
    where
        F: Fn(&ApiRequest, Outcome) -> Outcome + Send + Sync + 'static,
    {
        self.response_stages.push((name, Box::new(stage)));
        self
    }

    pub fn request_stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.request_stages.iter().map(|(name, _)| *name)
    }

    pub fn response_stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.response_stages.iter().map(|(name, _)| *name)
    }

    /// Run request stages in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub fn prepare(&self, request: &mut ApiRequest) -> Result<(), ApiError> {
        for (_, stage) in &self.request_stages {
            stage(request)?;
        }
        Ok(())
    }

    /// Thread `outcome` through every response stage in order.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the last stage produces.
    pub fn settle(&self, request: &ApiRequest, outcome: Outcome) -> Outcome {
        self.response_stages
            .iter()
            .fold(outcome, |acc, (_, stage)| stage(request, acc))
    }
}

/// Turn a received non-2xx response into its typed error.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for non-2xx responses and passes
/// transport errors through.
pub fn normalize(outcome: Outcome) -> Outcome {
    match outcome {
        Ok(resp) if !resp.is_success() => Err(ApiError::from_status(resp.status, &resp.body)),
        other => other,
    }
}

type InvalidationListener = Arc<dyn Fn() + Send + Sync>;

/// The client's default bearer credential, shared with the stages that must
/// clear it. Listeners registered with [`DefaultCredential::on_invalidated`]
/// run whenever a response stage revokes it.
#[derive(Clone, Default)]
pub struct DefaultCredential {
    token: Arc<Mutex<Option<String>>>,
    listeners: Arc<Mutex<Vec<InvalidationListener>>>,
}

impl DefaultCredential {
    pub fn set(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    pub fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn on_invalidated<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Clear the credential and notify every listener.
    pub fn invalidate(&self) {
        self.clear();
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for listener in listeners {
            listener();
        }
    }
}

#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Attach the persisted credential to every non-public request.
///
/// Public paths lose any `Authorization` header they were given. A storage
/// failure rejects the request with [`ApiError::Storage`].
pub fn attach_credential(
    store: Arc<dyn CredentialStore>,
) -> impl Fn(&mut ApiRequest) -> Result<(), ApiError> + Send + Sync + 'static {
    move |request| {
        if policy_for(&request.path).credential == CredentialPolicy::Omit {
            request.remove_header(AUTHORIZATION);
            leptos::logging::log!("public route, no credential: {}", request.path);
            return Ok(());
        }
        match store.get(TOKEN_KEY)? {
            Some(token) => {
                request.set_header(AUTHORIZATION, bearer(&token));
                leptos::logging::log!("credential attached: {}", request.path);
            }
            None => {
                request.remove_header(AUTHORIZATION);
                leptos::logging::log!("no stored credential for: {}", request.path);
            }
        }
        Ok(())
    }
}

/// On a 401 from a redirecting path, drop the credential everywhere and
/// hard-navigate to the login view. The outcome is always passed on unchanged.
pub fn invalidate_on_unauthorized(
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    default_credential: DefaultCredential,
) -> impl Fn(&ApiRequest, Outcome) -> Outcome + Send + Sync + 'static {
    move |request, outcome| {
        let forced = matches!(&outcome, Err(err) if err.is_unauthorized())
            && policy_for(&request.path).on_unauthorized == UnauthorizedPolicy::ForceLogin;
        if forced {
            leptos::logging::warn!("401 on {} - redirecting to login", request.path);
            if let Err(e) = store.remove(TOKEN_KEY) {
                leptos::logging::warn!("could not clear stored credential: {e}");
            }
            default_credential.invalidate();
            navigator.hard_redirect(LOGIN_PATH);
        }
        outcome
    }
}
