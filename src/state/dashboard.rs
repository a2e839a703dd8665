//! Home-screen summary: the user's leagues, pilot stats, recent predictions,
//! and the next race.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::Arc;

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::net::api;
use crate::net::client::ApiClient;

pub const DASHBOARD_FAILED: &str = "Could not load dashboard";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub member_count: u32,
    pub user_rank: u32,
    pub user_points: i64,
    pub is_admin: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotStat {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub acronym: String,
    /// Times picked, for the most-picked pilot.
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub avg_position: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPrediction {
    pub id: i64,
    pub race_name: String,
    pub race_date: String,
    pub points_earned: i64,
    pub correct_positions: u32,
    pub total_positions: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRace {
    pub id: i64,
    pub name: String,
    pub circuit: String,
    pub country: String,
    pub date: String,
    #[serde(default)]
    pub flag_url: Option<String>,
    pub has_prediction: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_points: i64,
    pub total_predictions: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub avg_points_per_race: f64,
    pub perfect_predictions: u32,
}

/// `GET /api/dashboard` body. Absent fields decode as empty.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardPayload {
    pub leagues: Vec<LeagueSummary>,
    pub most_picked_pilot: Option<PilotStat>,
    pub best_performing_pilot: Option<PilotStat>,
    pub recent_predictions: Vec<RecentPrediction>,
    pub next_race: Option<NextRace>,
    pub stats: Option<DashboardStats>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub leagues: Vec<LeagueSummary>,
    pub most_picked_pilot: Option<PilotStat>,
    pub best_performing_pilot: Option<PilotStat>,
    pub recent_predictions: Vec<RecentPrediction>,
    pub next_race: Option<NextRace>,
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    #[must_use]
    pub fn has_leagues(&self) -> bool {
        !self.leagues.is_empty()
    }

    #[must_use]
    pub fn has_predictions(&self) -> bool {
        !self.recent_predictions.is_empty()
    }
}

/// Replace every summary field from the payload.
pub fn apply_dashboard(state: &mut DashboardState, payload: DashboardPayload) {
    state.leagues = payload.leagues;
    state.most_picked_pilot = payload.most_picked_pilot;
    state.best_performing_pilot = payload.best_performing_pilot;
    state.recent_predictions = payload.recent_predictions;
    state.next_race = payload.next_race;
    state.stats = payload.stats;
}

#[derive(Clone)]
pub struct DashboardStore {
    state: RwSignal<DashboardState>,
    client: Arc<ApiClient>,
}

impl DashboardStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { state: RwSignal::new(DashboardState::default()), client }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<DashboardState> {
        self.state
    }

    pub async fn fetch_dashboard(&self) {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = self.client.get_json::<Option<DashboardPayload>>(api::DASHBOARD).await;
        self.state.update(|s| {
            s.loading = false;
            match outcome {
                Ok(payload) => apply_dashboard(s, payload.unwrap_or_default()),
                Err(err) => s.error = Some(err.user_message(DASHBOARD_FAILED)),
            }
        });
    }

    pub async fn fetch_leagues(&self) {
        if let Some(leagues) = self.refresh::<Option<Vec<LeagueSummary>>>(api::USER_LEAGUES).await {
            self.state.update(|s| s.leagues = leagues.unwrap_or_default());
        }
    }

    pub async fn fetch_stats(&self) {
        if let Some(stats) = self.refresh::<Option<DashboardStats>>(api::DASHBOARD_STATS).await {
            self.state.update(|s| s.stats = stats);
        }
    }

    pub async fn fetch_next_race(&self) {
        if let Some(next_race) = self.refresh::<Option<NextRace>>(api::NEXT_RACE).await {
            self.state.update(|s| s.next_race = next_race);
        }
    }

    /// Single-field refresh; failures are logged and leave state untouched.
    async fn refresh<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        match self.client.get_json::<T>(path).await {
            Ok(value) => Some(value),
            Err(err) => {
                leptos::logging::warn!("{path} refresh failed: {err}");
                None
            }
        }
    }

    pub fn reset(&self) {
        self.state.set(DashboardState::default());
    }
}
