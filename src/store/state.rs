//! Shared game state and its pure projections

use serde::{Deserialize, Serialize};

use crate::core::types::{HorseId, RoundId, TrackCondition};
use crate::generation::Horse;
use crate::race::engine::RaceState;
use crate::schedule::Round;
use crate::season::{GrandFinalResult, RoundResult};

/// Everything the season knows, in one place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub horses: Vec<Horse>,
    pub rounds: Vec<Round>,
    /// Finish orders in the order races were run
    pub results: Vec<RoundResult>,
    pub current_round: Option<RoundId>,
    pub track: Option<TrackCondition>,
    pub race: RaceState,
    pub last_finished_round_id: Option<RoundId>,
    pub grand_final_results: Vec<GrandFinalResult>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generated(&self) -> bool {
        !self.horses.is_empty()
    }

    pub fn round(&self, id: RoundId) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == id)
    }

    pub fn round_mut(&mut self, id: RoundId) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.id == id)
    }

    pub fn horse(&self, id: &HorseId) -> Option<&Horse> {
        self.horses.iter().find(|h| &h.id == id)
    }

    pub fn has_started_races(&self) -> bool {
        self.rounds.iter().any(|r| r.is_complete())
    }

    pub fn all_rounds_completed(&self, round_count: usize) -> bool {
        !self.rounds.is_empty()
            && self.rounds.len() == round_count
            && self.rounds.iter().all(|r| r.is_complete())
    }

    /// First round still waiting for a result
    pub fn next_round_id(&self) -> Option<RoundId> {
        self.rounds.iter().find(|r| !r.is_complete()).map(|r| r.id)
    }

    /// `"dirt muddy"`, or a placeholder before any track is set
    pub fn track_label(&self) -> String {
        match &self.track {
            Some(track) => track.to_string(),
            None => "Track pending".to_string(),
        }
    }

    /// Active race whose runners all resolve to pool horses
    pub fn validate_race_data(&self) -> bool {
        self.race.is_race_active
            && self
                .race
                .current_race_horses
                .iter()
                .all(|rh| self.horse(&rh.horse_id).is_some())
    }
}
