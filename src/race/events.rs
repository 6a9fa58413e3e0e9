//! Race events and observer hooks
//!
//! Events are returned from each tick for callers that poll. Observers are
//! fire-and-forget hooks for audio/animation collaborators; they only ever see
//! shared references, so calling them any number of times cannot corrupt state.

use serde::{Deserialize, Serialize};

use crate::core::types::{HorseId, Millis, RoundId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEventKind {
    HorseFinished { horse: HorseId, place: usize },
    AllFinished { finalize_at: Millis },
    RaceFinalized { round: RoundId, order: Vec<HorseId> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub at: Millis,
    pub kind: RaceEventKind,
}

/// Events produced by one command or tick
#[derive(Debug, Clone, Default)]
pub struct RaceEventLog {
    pub events: Vec<RaceEvent>,
}

impl RaceEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: RaceEventKind, at: Millis) {
        self.events.push(RaceEvent { at, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn extend(&mut self, other: RaceEventLog) {
        self.events.extend(other.events);
    }

    /// Horses that crossed the line in this log, in order
    pub fn finishers(&self) -> Vec<&HorseId> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                RaceEventKind::HorseFinished { horse, .. } => Some(horse),
                _ => None,
            })
            .collect()
    }

    pub fn finalized_order(&self) -> Option<&[HorseId]> {
        self.events.iter().find_map(|e| match &e.kind {
            RaceEventKind::RaceFinalized { order, .. } => Some(order.as_slice()),
            _ => None,
        })
    }
}

/// Side-channel hooks for non-core collaborators
pub trait RaceObserver {
    fn on_countdown_complete(&mut self, _round: RoundId) {}

    fn on_race_finalized(&mut self, _round: RoundId, _order: &[HorseId]) {}

    fn on_pause_changed(&mut self, _paused: bool) {}
}
