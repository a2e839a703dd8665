//! The single egress point for REST calls.
//!
//! Every call is merged with the default headers, prepared by the request
//! stages, sent, normalized, and settled by the response stages. Callers
//! only ever see an `Ok` payload or an [`ApiError`].

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::net::error::ApiError;
use crate::net::pipeline::{
    ATTACH_CREDENTIAL, DefaultCredential, INVALIDATE_ON_UNAUTHORIZED, RequestPipeline, attach_credential, bearer,
    invalidate_on_unauthorized, normalize,
};
use crate::net::transport::{AUTHORIZATION, ApiRequest, ApiResponse, Method, Transport};
use crate::util::navigation::Navigator;
use crate::util::storage::CredentialStore;

pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    pipeline: RequestPipeline,
    default_credential: DefaultCredential,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        pipeline: RequestPipeline,
        default_credential: DefaultCredential,
    ) -> Self {
        Self { base_url: base_url.into(), transport, pipeline, default_credential }
    }

    /// Client with the standard credential and unauthorized stages.
    pub fn with_default_pipeline(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let default_credential = DefaultCredential::default();
        let pipeline = RequestPipeline::new()
            .with_request_stage(ATTACH_CREDENTIAL, attach_credential(store.clone()))
            .with_response_stage(
                INVALIDATE_ON_UNAUTHORIZED,
                invalidate_on_unauthorized(store, navigator, default_credential.clone()),
            );
        leptos::logging::log!("API base URL: {}", config.base_url);
        Self::new(config.base_url.clone(), transport, pipeline, default_credential)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub fn set_default_credential(&self, token: &str) {
        self.default_credential.set(token);
    }

    pub fn clear_default_credential(&self) {
        self.default_credential.clear();
    }

    /// Run `listener` whenever a response stage revokes the credential.
    pub fn on_credential_invalidated<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.default_credential.on_invalidated(listener);
    }

    /// Current default `Authorization` header value, if any.
    #[must_use]
    pub fn default_authorization(&self) -> Option<String> {
        self.default_credential.get().map(|t| bearer(&t))
    }

    /// Run `request` through the pipeline and transport.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for rejected stages, transport
    /// failures, and non-2xx responses.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.header(AUTHORIZATION).is_none()
            && let Some(value) = self.default_authorization()
        {
            request.set_header(AUTHORIZATION, value);
        }
        let outcome = match self.pipeline.prepare(&mut request) {
            Ok(()) => normalize(self.transport.send(&self.base_url, &request).await),
            Err(err) => Err(err),
        };
        self.pipeline.settle(&request, outcome)
    }

    /// `GET path` decoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; undecodable bodies are `Network` failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::new(Method::Get, path)).await?.json()
    }

    /// `POST path` with a JSON body, response decoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; undecodable bodies are `Network` failures.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Post, path).with_json(body)?;
        self.execute(request).await?.json()
    }

    /// `POST path` with an optional JSON body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn post<B: Serialize>(&self, path: &str, body: Option<&B>) -> Result<(), ApiError> {
        let mut request = ApiRequest::new(Method::Post, path);
        if let Some(body) = body {
            request = request.with_json(body)?;
        }
        self.execute(request).await.map(|_| ())
    }
}
