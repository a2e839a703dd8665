//! League membership, rankings, and the position-prediction draft.
//!
//! DESIGN
//! ======
//! The draft maps finishing position to an optional pilot. A pilot can hold
//! at most one position, so assigning it somewhere clears it everywhere
//! else. Catalogue reads (leagues, pilots) fall back to built-in data when
//! the API is unreachable; writes (join, leave, submit) report failure.

#[cfg(test)]
#[path = "leagues_test.rs"]
mod leagues_test;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::net::api;
use crate::net::client::ApiClient;
use crate::state::pilots::{Pilot, default_pilots};

pub const RANKINGS_FAILED: &str = "Could not load rankings";
pub const JOIN_FAILED: &str = "Could not join league";
pub const LEAVE_FAILED: &str = "Could not leave league";
pub const SUBMIT_FAILED: &str = "Could not submit prediction";
pub const INCOMPLETE_PREDICTION: &str = "Fill every position before submitting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeagueType {
    Race,
    Qualy,
    Sprint,
}

impl LeagueType {
    pub const ALL: [Self; 3] = [Self::Race, Self::Qualy, Self::Sprint];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Qualy => "qualy",
            Self::Sprint => "sprint",
        }
    }

    /// Positions a prediction must fill.
    #[must_use]
    pub fn positions_count(self) -> u32 {
        match self {
            Self::Race | Self::Qualy => 10,
            Self::Sprint => 8,
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == slug)
    }
}

impl fmt::Display for LeagueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueInfo {
    pub id: i64,
    pub slug: LeagueType,
    pub name: String,
    pub description: String,
    /// Material icon name.
    pub icon: String,
    pub positions_count: u32,
    pub member_count: u32,
    pub is_joined: bool,
    #[serde(default)]
    pub user_rank: Option<u32>,
    #[serde(default)]
    pub user_points: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRanking {
    pub rank: u32,
    pub user_id: i64,
    pub username: String,
    pub points: i64,
    pub predictions_count: u32,
    pub perfect_predictions: u32,
    pub is_current_user: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub league_id: i64,
    pub race_id: i64,
    /// Finishing position to pilot id.
    pub positions: BTreeMap<u32, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEvent {
    pub id: i64,
    pub name: String,
    pub circuit: String,
    pub country: String,
    /// ISO-8601 start time.
    pub date: String,
    pub has_user_prediction: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitPredictionRequest<'a> {
    event_id: i64,
    positions: &'a BTreeMap<u32, i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaguesState {
    pub available_leagues: Vec<LeagueInfo>,
    pub current_league: Option<LeagueInfo>,
    pub rankings: Vec<LeagueRanking>,
    pub next_event: Option<NextEvent>,
    pub current_prediction: BTreeMap<u32, Option<i64>>,
    pub existing_prediction: Option<LeaguePrediction>,
    pub pilots: Vec<Pilot>,
    pub loading: bool,
    pub ranking_loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl LeaguesState {
    pub fn joined_leagues(&self) -> impl Iterator<Item = &LeagueInfo> {
        self.available_leagues.iter().filter(|l| l.is_joined)
    }

    pub fn not_joined_leagues(&self) -> impl Iterator<Item = &LeagueInfo> {
        self.available_leagues.iter().filter(|l| !l.is_joined)
    }

    /// Every position of the selected league has a pilot.
    #[must_use]
    pub fn is_prediction_complete(&self) -> bool {
        let Some(league) = &self.current_league else {
            return false;
        };
        let filled = self.current_prediction.values().filter(|p| p.is_some()).count();
        filled == league.positions_count as usize
    }

    #[must_use]
    pub fn has_prediction(&self) -> bool {
        self.existing_prediction.is_some()
    }
}

/// Put `pilot` at `position`, removing it from any other position.
pub fn set_position(state: &mut LeaguesState, position: u32, pilot: Option<i64>) {
    if let Some(id) = pilot {
        for (pos, slot) in &mut state.current_prediction {
            if *pos != position && *slot == Some(id) {
                *slot = None;
            }
        }
    }
    state.current_prediction.insert(position, pilot);
}

/// Only the filled positions of a draft.
#[must_use]
pub fn filled_positions(draft: &BTreeMap<u32, Option<i64>>) -> BTreeMap<u32, i64> {
    draft
        .iter()
        .filter_map(|(pos, pilot)| pilot.map(|id| (*pos, id)))
        .collect()
}

pub fn apply_existing_prediction(state: &mut LeaguesState, prediction: Option<LeaguePrediction>) {
    state.current_prediction = prediction
        .as_ref()
        .map(|p| p.positions.iter().map(|(pos, id)| (*pos, Some(*id))).collect())
        .unwrap_or_default();
    state.existing_prediction = prediction;
}

/// Record a membership change for `slug`. Member counts only move when the
/// joined flag actually flips.
pub fn apply_membership(state: &mut LeaguesState, slug: LeagueType, joined: bool) {
    let leagues = state.available_leagues.iter_mut().chain(state.current_league.as_mut());
    for league in leagues {
        if league.slug != slug || league.is_joined == joined {
            continue;
        }
        league.is_joined = joined;
        league.member_count = if joined {
            league.member_count.saturating_add(1)
        } else {
            league.member_count.saturating_sub(1)
        };
    }
}

#[derive(Clone)]
pub struct LeaguesStore {
    state: RwSignal<LeaguesState>,
    client: Arc<ApiClient>,
}

impl LeaguesStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { state: RwSignal::new(LeaguesState::default()), client }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<LeaguesState> {
        self.state
    }

    fn begin_loading(&self) {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    pub async fn fetch_leagues(&self) {
        self.begin_loading();
        let leagues = match self.client.get_json::<Option<Vec<LeagueInfo>>>(api::LEAGUES).await {
            Ok(leagues) => leagues.unwrap_or_default(),
            Err(err) => {
                leptos::logging::warn!("using built-in leagues: {err}");
                default_leagues()
            }
        };
        self.state.update(|s| {
            s.available_leagues = leagues;
            s.loading = false;
        });
    }

    pub async fn fetch_league_details(&self, slug: LeagueType) {
        self.begin_loading();
        let league = match self.client.get_json::<Option<LeagueInfo>>(&api::league_endpoint(slug)).await {
            Ok(league) => league,
            Err(err) => {
                leptos::logging::warn!("using built-in {slug} league: {err}");
                default_leagues().into_iter().find(|l| l.slug == slug)
            }
        };
        self.state.update(|s| {
            s.current_league = league;
            s.loading = false;
        });
    }

    pub async fn fetch_league_rankings(&self, slug: LeagueType) {
        self.state.update(|s| s.ranking_loading = true);
        let outcome = self
            .client
            .get_json::<Option<Vec<LeagueRanking>>>(&api::league_rankings_endpoint(slug))
            .await;
        self.state.update(|s| {
            s.ranking_loading = false;
            match outcome {
                Ok(rankings) => s.rankings = rankings.unwrap_or_default(),
                Err(err) => {
                    s.rankings.clear();
                    s.error = Some(err.user_message(RANKINGS_FAILED));
                }
            }
        });
    }

    pub async fn fetch_next_event(&self, slug: LeagueType) {
        let event = match self
            .client
            .get_json::<Option<NextEvent>>(&api::league_next_event_endpoint(slug))
            .await
        {
            Ok(event) => event,
            Err(err) => {
                leptos::logging::warn!("no next event for {slug}: {err}");
                None
            }
        };
        self.state.update(|s| s.next_event = event);
    }

    /// Load the user's saved prediction for `event_id` into the draft.
    pub async fn fetch_user_prediction(&self, slug: LeagueType, event_id: i64) {
        let prediction = self
            .client
            .get_json::<Option<LeaguePrediction>>(&api::league_prediction_endpoint(slug, event_id))
            .await
            .unwrap_or_default();
        self.state.update(|s| apply_existing_prediction(s, prediction));
    }

    pub async fn fetch_pilots(&self) {
        let pilots = match self.client.get_json::<Option<Vec<Pilot>>>(api::PILOTS).await {
            Ok(pilots) => pilots.unwrap_or_default(),
            Err(err) => {
                leptos::logging::warn!("using built-in grid: {err}");
                default_pilots()
            }
        };
        self.state.update(|s| s.pilots = pilots);
    }

    pub async fn join_league(&self, slug: LeagueType) -> bool {
        self.change_membership(slug, true).await
    }

    pub async fn leave_league(&self, slug: LeagueType) -> bool {
        self.change_membership(slug, false).await
    }

    async fn change_membership(&self, slug: LeagueType, joined: bool) -> bool {
        self.begin_loading();
        let (path, default_error) = if joined {
            (api::league_join_endpoint(slug), JOIN_FAILED)
        } else {
            (api::league_leave_endpoint(slug), LEAVE_FAILED)
        };
        let outcome = self.client.post::<()>(&path, None).await;
        let ok = outcome.is_ok();
        self.state.update(|s| {
            s.loading = false;
            match outcome {
                Ok(()) => apply_membership(s, slug, joined),
                Err(err) => s.error = Some(err.user_message(default_error)),
            }
        });
        ok
    }

    pub fn set_position(&self, position: u32, pilot: Option<i64>) {
        self.state.update(|s| set_position(s, position, pilot));
    }

    pub fn clear_prediction(&self) {
        self.state.update(|s| {
            s.current_prediction.clear();
            s.success = false;
            s.error = None;
        });
    }

    /// Submit the draft for `event_id`. Incomplete drafts are refused
    /// without a request.
    pub async fn submit_prediction(&self, slug: LeagueType, event_id: i64) -> bool {
        let (complete, positions, league_id) = self.state.with_untracked(|s| {
            (
                s.is_prediction_complete(),
                filled_positions(&s.current_prediction),
                s.current_league.as_ref().map_or(0, |l| l.id),
            )
        });
        if !complete {
            self.state.update(|s| s.error = Some(INCOMPLETE_PREDICTION.to_owned()));
            return false;
        }

        self.state.update(|s| {
            s.submitting = true;
            s.error = None;
            s.success = false;
        });
        let body = SubmitPredictionRequest { event_id, positions: &positions };
        let outcome = self
            .client
            .post(&api::league_predictions_endpoint(slug), Some(&body))
            .await;
        let ok = outcome.is_ok();
        self.state.update(|s| {
            s.submitting = false;
            match outcome {
                Ok(()) => {
                    s.success = true;
                    s.existing_prediction = Some(LeaguePrediction {
                        id: None,
                        league_id,
                        race_id: event_id,
                        positions,
                        submitted_at: None,
                        points_earned: None,
                    });
                    if let Some(event) = s.next_event.as_mut() {
                        event.has_user_prediction = true;
                    }
                }
                Err(err) => s.error = Some(err.user_message(SUBMIT_FAILED)),
            }
        });
        ok
    }

    pub fn reset(&self) {
        self.state.set(LeaguesState::default());
    }
}

/// The three league types, as offered before the API has answered.
#[must_use]
pub fn default_leagues() -> Vec<LeagueInfo> {
    let league = |id, slug: LeagueType, name: &str, description: &str, icon: &str, member_count| LeagueInfo {
        id,
        slug,
        name: name.to_owned(),
        description: description.to_owned(),
        icon: icon.to_owned(),
        positions_count: slug.positions_count(),
        member_count,
        is_joined: false,
        user_rank: None,
        user_points: None,
    };
    vec![
        league(
            1,
            LeagueType::Race,
            "Race League",
            "Predict the top 10 of every race and score points for each hit.",
            "sports_score",
            1247,
        ),
        league(
            2,
            LeagueType::Qualy,
            "Qualy League",
            "Predict the top 10 of every qualifying session and prove you know raw pace.",
            "timer",
            892,
        ),
        league(
            3,
            LeagueType::Sprint,
            "Sprint League",
            "Predict the top 8 of every sprint. Fewer positions, more intensity.",
            "bolt",
            634,
        ),
    ]
}
