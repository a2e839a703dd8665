//! REST endpoint paths consumed by the client.
//!
//! Paths are relative to the configured base address.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::state::leagues::LeagueType;

pub const LOGIN: &str = "/api/auth/login";
pub const REGISTER: &str = "/api/auth/register";
pub const CURRENT_USER: &str = "/api/auth/me";

pub const DASHBOARD: &str = "/api/dashboard";
pub const DASHBOARD_STATS: &str = "/api/dashboard/stats";
pub const USER_LEAGUES: &str = "/api/leagues/user";
pub const NEXT_RACE: &str = "/api/races/next";

pub const LEAGUES: &str = "/api/leagues";
pub const PILOTS: &str = "/api/pilots";
pub const PREDICTIONS: &str = "/api/predictions";

pub fn league_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}")
}

pub fn league_rankings_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}/rankings")
}

pub fn league_next_event_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}/next-event")
}

pub fn league_predictions_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}/predictions")
}

pub fn league_prediction_endpoint(slug: LeagueType, event_id: i64) -> String {
    format!("{LEAGUES}/{slug}/predictions/{event_id}")
}

pub fn league_join_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}/join")
}

pub fn league_leave_endpoint(slug: LeagueType) -> String {
    format!("{LEAGUES}/{slug}/leave")
}
