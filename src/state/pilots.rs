//! Driver roster state.

#[cfg(test)]
#[path = "pilots_test.rs"]
mod pilots_test;

use std::sync::Arc;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::net::api;
use crate::net::client::ApiClient;

pub const PILOTS_FAILED: &str = "Could not load pilots";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: i64,
    pub name: String,
    pub team: String,
    /// Car number as printed, e.g. `"44"`.
    pub number: String,
    /// Three-letter timing-screen code.
    pub acronym: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PilotsState {
    pub pilots: Vec<Pilot>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct PilotsStore {
    state: RwSignal<PilotsState>,
    client: Arc<ApiClient>,
}

impl PilotsStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { state: RwSignal::new(PilotsState::default()), client }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<PilotsState> {
        self.state
    }

    pub async fn fetch_pilots(&self) {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = self.client.get_json::<Vec<Pilot>>(api::PILOTS).await;
        self.state.update(|s| {
            s.loading = false;
            match outcome {
                Ok(pilots) => s.pilots = pilots,
                Err(err) => s.error = Some(err.user_message(PILOTS_FAILED)),
            }
        });
    }
}

fn pilot(id: i64, name: &str, team: &str, number: &str, acronym: &str) -> Pilot {
    Pilot {
        id,
        name: name.to_owned(),
        team: team.to_owned(),
        number: number.to_owned(),
        acronym: acronym.to_owned(),
    }
}

/// Built-in 2025 grid, used when the roster endpoint is unreachable.
#[must_use]
pub fn default_pilots() -> Vec<Pilot> {
    vec![
        pilot(1, "Max Verstappen", "Red Bull Racing", "1", "VER"),
        pilot(2, "Sergio Pérez", "Red Bull Racing", "11", "PER"),
        pilot(3, "Lewis Hamilton", "Ferrari", "44", "HAM"),
        pilot(4, "Charles Leclerc", "Ferrari", "16", "LEC"),
        pilot(5, "Lando Norris", "McLaren", "4", "NOR"),
        pilot(6, "Oscar Piastri", "McLaren", "81", "PIA"),
        pilot(7, "George Russell", "Mercedes", "63", "RUS"),
        pilot(8, "Andrea Kimi Antonelli", "Mercedes", "12", "ANT"),
        pilot(9, "Fernando Alonso", "Aston Martin", "14", "ALO"),
        pilot(10, "Lance Stroll", "Aston Martin", "18", "STR"),
        pilot(11, "Pierre Gasly", "Alpine", "10", "GAS"),
        pilot(12, "Jack Doohan", "Alpine", "7", "DOO"),
        pilot(13, "Yuki Tsunoda", "Racing Bulls", "22", "TSU"),
        pilot(14, "Isack Hadjar", "Racing Bulls", "6", "HAD"),
        pilot(15, "Nico Hülkenberg", "Kick Sauber", "27", "HUL"),
        pilot(16, "Gabriel Bortoleto", "Kick Sauber", "5", "BOR"),
        pilot(17, "Esteban Ocon", "Haas", "31", "OCO"),
        pilot(18, "Oliver Bearman", "Haas", "87", "BEA"),
        pilot(19, "Alexander Albon", "Williams", "23", "ALB"),
        pilot(20, "Carlos Sainz", "Williams", "55", "SAI"),
    ]
}
