//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::ClientConfig;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::transport::{ApiRequest, ApiResponse, Transport};
use crate::util::navigation::Navigator;
use crate::util::storage::{CredentialStore, MemoryStorage, StorageError};

/// Transport replaying queued outcomes in order and recording every request
/// it was handed. Each send yields once before answering so concurrent
/// operations can interleave.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, outcome: Result<ApiResponse, ApiError>) {
        self.responses.lock().unwrap().push_back(outcome);
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(ApiResponse { status, body: body.to_string() }));
    }

    pub fn push_network_error(&self) {
        self.push(Err(ApiError::network("connection refused")));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("no scripted response")))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn hard_redirect(&self, path: &str) {
        self.redirects.lock().unwrap().push(path.to_owned());
    }
}

/// Store whose every access fails.
pub struct FailingStorage;

impl CredentialStore for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Rejected { op: "write", key: key.to_owned() })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Everything a client-level test needs, wired with the default pipeline.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: MemoryStorage,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MemoryStorage::new())
    }

    pub fn with_store(store: MemoryStorage) -> Self {
        let transport = MockTransport::new();
        let navigator = RecordingNavigator::new();
        let client = Arc::new(ApiClient::with_default_pipeline(
            &ClientConfig::development(),
            transport.clone(),
            Arc::new(store.clone()),
            navigator.clone(),
        ));
        Self { transport, store, navigator, client }
    }
}

pub fn user_json(id: i64, username: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "username": username, "email": format!("{username}@example.com") })
}
