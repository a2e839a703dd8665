//! Standalone prediction submission used by the prediction page.

#[cfg(test)]
#[path = "prediction_test.rs"]
mod prediction_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;

use crate::net::api;
use crate::net::client::ApiClient;

pub const PREDICTION_FAILED: &str = "Could not save prediction";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictionState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    prediction: &'a BTreeMap<u32, i64>,
}

#[derive(Clone)]
pub struct PredictionStore {
    state: RwSignal<PredictionState>,
    client: Arc<ApiClient>,
}

impl PredictionStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { state: RwSignal::new(PredictionState::default()), client }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<PredictionState> {
        self.state
    }

    /// Post `positions` (finishing position to pilot id).
    pub async fn submit_prediction(&self, positions: &BTreeMap<u32, i64>) -> bool {
        self.state.set(PredictionState { loading: true, ..PredictionState::default() });
        let outcome = self
            .client
            .post(api::PREDICTIONS, Some(&PredictionRequest { prediction: positions }))
            .await;
        let ok = outcome.is_ok();
        self.state.update(|s| {
            s.loading = false;
            match outcome {
                Ok(()) => s.success = true,
                Err(err) => s.error = Some(err.user_message(PREDICTION_FAILED)),
            }
        });
        ok
    }
}
