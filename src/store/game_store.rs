//! Command/query surface over the shared game state
//!
//! Commands are the only way state changes. Queries are pure projections and
//! never mutate.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::core::config::RaceConfig;
use crate::core::error::{RaceError, Result};
use crate::core::types::{HorseId, Millis, RoundId, Surface, TrackCondition};
use crate::generation::{self, Horse};
use crate::race::engine::{RaceEngine, RacePhase, RaceState};
use crate::race::events::{RaceEventKind, RaceEventLog, RaceObserver};
use crate::race::speed::calculate_horse_speed;
use crate::race::standings::{self, RaceHorse, RaceStatistics, StandingEntry};
use crate::schedule::{self, Round};
use crate::season::{self, GrandFinalResult, RoundPoints, RoundResult};
use crate::store::state::GameState;

/// The season store: state, race engine, random source and observers
pub struct GameStore<R: Rng = ChaCha8Rng> {
    config: RaceConfig,
    state: GameState,
    engine: RaceEngine,
    rng: R,
    observers: Vec<Box<dyn RaceObserver>>,
}

impl GameStore<ChaCha8Rng> {
    /// Store with an entropy-seeded generator
    pub fn new(config: RaceConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Store with a reproducible generator
    pub fn with_seed(config: RaceConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameStore<R> {
    pub fn with_rng(config: RaceConfig, rng: R) -> Self {
        let engine = RaceEngine::new(config.motion.clone());
        Self {
            config,
            state: GameState::new(),
            engine,
            rng,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn RaceObserver>) {
        self.observers.push(observer);
    }

    fn notify(&mut self, mut hook: impl FnMut(&mut dyn RaceObserver)) {
        for observer in &mut self.observers {
            hook(observer.as_mut());
        }
    }

    // ===== COMMANDS =====

    /// Generate a full pool
    pub fn generate_horses(&mut self) -> Result<&[Horse]> {
        self.generate_horse_count(self.config.season.horse_pool_size)
    }

    /// Generate up to `count` horses (capped at the pool size)
    ///
    /// Refused while a race is running; its runners must stay in the pool.
    pub fn generate_horse_count(&mut self, count: usize) -> Result<&[Horse]> {
        if self.state.race.is_race_active {
            let round = self.state.current_round.unwrap_or(RoundId(0));
            return Err(RaceError::RaceAlreadyActive(round));
        }

        self.state.horses = generation::generate_horses(
            count,
            &self.config.season,
            &self.config.condition,
            &mut self.rng,
        );
        info!(count = self.state.horses.len(), "horses generated");
        Ok(&self.state.horses)
    }

    /// Build the season's rounds from the current pool
    pub fn generate_race_schedule(&mut self) -> Result<&[Round]> {
        if self.state.race.is_race_active {
            let round = self.state.current_round.unwrap_or(RoundId(0));
            return Err(RaceError::RaceAlreadyActive(round));
        }

        let rounds =
            schedule::generate_race_schedule(&self.state.horses, &self.config.season, &mut self.rng)?;

        self.state.rounds = rounds;
        self.state.results.clear();
        self.state.grand_final_results.clear();
        self.state.current_round = None;
        self.state.last_finished_round_id = None;
        info!(rounds = self.state.rounds.len(), "race schedule generated");
        Ok(&self.state.rounds)
    }

    /// Pick a random surface and condition and make it the current track
    pub fn generate_random_track(&mut self) -> TrackCondition {
        let surface = generation::random_surface(&mut self.rng);
        let track = generation::generate_random_track(surface, &mut self.rng);
        self.state.track = Some(track);
        track
    }

    /// Load a round into the race engine
    ///
    /// Every participant is resolved before anything is written, so a failed
    /// start leaves the store untouched.
    pub fn start_race(&mut self, round_id: RoundId, now: Millis) -> Result<()> {
        if self.state.race.is_race_active {
            let active = self.state.current_round.unwrap_or(round_id);
            return Err(RaceError::RaceAlreadyActive(active));
        }

        let round = self
            .state
            .round(round_id)
            .ok_or(RaceError::RoundNotFound(round_id))?;
        if round.is_complete() {
            return Err(RaceError::RoundAlreadyRun(round_id));
        }
        let track = round.track;
        let distance = round.distance;
        let participants = round.participants.clone();

        let mut recovered = Vec::with_capacity(participants.len());
        for horse_id in &participants {
            let mut horse = self
                .state
                .horse(horse_id)
                .ok_or_else(|| RaceError::HorseNotFound(horse_id.clone()))?
                .clone();
            season::apply_recovery(&mut horse, round_id, &self.config.condition);
            recovered.push(horse);
        }

        // ===== COMMIT =====
        for horse in &recovered {
            if let Some(slot) = self.state.horses.iter_mut().find(|h| h.id == horse.id) {
                *slot = horse.clone();
            }
        }
        self.state.current_round = Some(round_id);
        self.state.track = Some(track);

        let race_horses: Vec<RaceHorse> = recovered
            .iter()
            .map(|horse| {
                let speed = calculate_horse_speed(horse, &track, &self.config.speed, &mut self.rng);
                RaceHorse::new(horse.id.clone(), speed)
            })
            .collect();

        self.state.race = RaceState {
            is_race_active: true,
            is_paused: false,
            current_race_horses: race_horses,
            race_distance: distance as f64,
            race_start_time: now,
        };
        self.engine
            .begin(round_id, &self.state.race, &self.state.horses, &track, now);

        info!(round = %round_id, distance, track = %track, runners = participants.len(), "race started");
        Ok(())
    }

    /// Countdown finished; the field starts moving on the next tick
    pub fn handle_countdown_complete(&mut self, now: Millis) -> bool {
        if !self
            .engine
            .complete_countdown(&self.state.race, &mut self.rng, now)
        {
            debug!("countdown complete ignored, no race in countdown");
            return false;
        }

        if let Some(round) = self.state.current_round {
            info!(round = %round, "gates open");
            self.notify(|o| o.on_countdown_complete(round));
        }
        true
    }

    pub fn pause_race(&mut self) -> bool {
        if !self.state.race.is_race_active || self.state.race.is_paused {
            return false;
        }
        self.state.race.is_paused = true;
        self.engine.pause();
        info!("race paused");
        self.notify(|o| o.on_pause_changed(true));
        true
    }

    pub fn resume_race(&mut self, now: Millis) -> bool {
        if !self.state.race.is_race_active || !self.state.race.is_paused {
            return false;
        }
        self.state.race.is_paused = false;
        self.engine.resume(now);
        self.engine.restart(&self.state.race, now);
        info!("race resumed");
        self.notify(|o| o.on_pause_changed(false));
        true
    }

    /// Re-arm ticking after `stop`; a finished field is finalized again
    /// after the settle delay
    pub fn restart(&mut self, now: Millis) -> RaceEventLog {
        let events = self.engine.restart(&self.state.race, now);
        if self.engine.is_ticking() {
            debug!(round = ?self.state.current_round, "ticking restarted");
        }
        events
    }

    /// Periodic update; safe in any state
    pub fn tick(&mut self, now: Millis) -> RaceEventLog {
        let round = self.state.current_round;
        let outcome = self.engine.tick(&mut self.state.race, &mut self.rng, now);
        let mut events = outcome.events;

        if let Some(order) = outcome.finalize {
            match self.finish_race(order.clone()) {
                Ok(true) => {
                    if let Some(round) = round {
                        events.push(RaceEventKind::RaceFinalized { round, order }, now);
                    }
                }
                Ok(false) => {}
                Err(e) => warn!(error = %e, "finalize rejected"),
            }
        }

        events
    }

    /// Record the finish order of the active race
    ///
    /// Returns `Ok(false)` without touching anything once the race is no
    /// longer active.
    pub fn finish_race(&mut self, order: Vec<HorseId>) -> Result<bool> {
        if !self.state.race.is_race_active {
            debug!("finish_race ignored, no active race");
            return Ok(false);
        }
        let Some(round_id) = self.state.current_round else {
            return Ok(false);
        };

        let round = self
            .state
            .round(round_id)
            .ok_or(RaceError::RoundNotFound(round_id))?;
        validate_finish_order(round, &order)?;

        // ===== COMMIT =====
        if let Some(round) = self.state.round_mut(round_id) {
            round.result = Some(order.clone());
        }
        self.state.results.push(RoundResult {
            round_id,
            order: order.clone(),
        });

        let field_size = order.len();
        for (finish_index, horse_id) in order.iter().enumerate() {
            if let Some(horse) = self.state.horses.iter_mut().find(|h| &h.id == horse_id) {
                season::apply_finish_penalty(
                    horse,
                    finish_index,
                    field_size,
                    round_id,
                    &self.config.condition,
                    &mut self.rng,
                );
            }
        }

        self.state.race = RaceState::default();
        self.state.last_finished_round_id = Some(round_id);
        self.engine.end();

        info!(round = %round_id, winner = ?order.first(), "race finalized");
        self.notify(|o| o.on_race_finalized(round_id, &order));
        Ok(true)
    }

    /// Season ranking; fails until every round has a result
    pub fn calculate_grand_final_results(&mut self) -> Result<&[GrandFinalResult]> {
        let results = season::calculate_grand_final_results(
            &self.state.rounds,
            &self.state.horses,
            &self.config.scoring,
        )?;
        info!(
            winner = ?results.first().map(|r| &r.horse_id),
            "grand final results calculated"
        );
        self.state.grand_final_results = results;
        Ok(&self.state.grand_final_results)
    }

    /// Point the store at the following round without starting it
    pub fn next_round(&mut self) -> Option<RoundId> {
        let next = RoundId(self.state.current_round.map_or(1, |r| r.0 + 1));
        let track = self.state.round(next)?.track;
        self.state.current_round = Some(next);
        self.state.track = Some(track);
        Some(next)
    }

    pub fn clear_last_finished_round(&mut self) {
        self.state.last_finished_round_id = None;
    }

    /// Stop ticking and cancel any pending finalize (idempotent)
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Back to an empty season (idempotent)
    pub fn reset_game(&mut self) {
        self.engine.reset();
        self.state = GameState::new();
        info!("game reset");
    }

    // ===== QUERIES =====

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &RaceEngine {
        &self.engine
    }

    pub fn horses(&self) -> &[Horse] {
        &self.state.horses
    }

    pub fn horse(&self, id: &HorseId) -> Option<&Horse> {
        self.state.horse(id)
    }

    pub fn rounds(&self) -> &[Round] {
        &self.state.rounds
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.state.results
    }

    pub fn current_round(&self) -> Option<RoundId> {
        self.state.current_round
    }

    pub fn current_round_record(&self) -> Option<&Round> {
        self.state.current_round.and_then(|id| self.state.round(id))
    }

    pub fn track(&self) -> Option<&TrackCondition> {
        self.state.track.as_ref()
    }

    pub fn surface(&self) -> Option<Surface> {
        self.state.track.map(|t| t.surface())
    }

    pub fn track_label(&self) -> String {
        self.state.track_label()
    }

    pub fn race_state(&self) -> &RaceState {
        &self.state.race
    }

    pub fn current_race_horses(&self) -> &[RaceHorse] {
        &self.state.race.current_race_horses
    }

    /// Leader's progress, percent
    pub fn race_progress(&self) -> f64 {
        standings::race_progress(
            &self.state.race.current_race_horses,
            self.state.race.race_distance,
        )
    }

    pub fn is_race_active(&self) -> bool {
        self.state.race.is_race_active
    }

    pub fn is_paused(&self) -> bool {
        self.state.race.is_paused
    }

    pub fn phase(&self) -> RacePhase {
        self.engine.phase()
    }

    pub fn round_result(&self, id: RoundId) -> Option<&[HorseId]> {
        self.state.round(id).and_then(|r| r.result.as_deref())
    }

    pub fn round_points(&self) -> Vec<RoundPoints> {
        season::round_points(&self.state.rounds, &self.config.scoring)
    }

    pub fn grand_final_results(&self) -> &[GrandFinalResult] {
        &self.state.grand_final_results
    }

    pub fn last_finished_round_id(&self) -> Option<RoundId> {
        self.state.last_finished_round_id
    }

    pub fn is_generated(&self) -> bool {
        self.state.is_generated()
    }

    pub fn has_started_races(&self) -> bool {
        self.state.has_started_races()
    }

    pub fn all_rounds_completed(&self) -> bool {
        self.state.all_rounds_completed(self.config.season.round_count)
    }

    pub fn next_round_id(&self) -> Option<RoundId> {
        self.state.next_round_id()
    }

    pub fn live_standings(&self, limit: usize) -> Vec<StandingEntry> {
        standings::live_standings(&self.state.race.current_race_horses, &self.state.horses, limit)
    }

    pub fn race_statistics(&self) -> RaceStatistics {
        standings::race_statistics(
            &self.state.race.current_race_horses,
            self.state.race.race_distance,
        )
    }

    pub fn validate_race_data(&self) -> bool {
        self.state.validate_race_data()
    }
}

/// A finish order must be a permutation of the round's field
fn validate_finish_order(round: &Round, order: &[HorseId]) -> Result<()> {
    let invalid = |reason: String| RaceError::InvalidFinishOrder {
        round: round.id,
        reason,
    };

    if order.len() != round.participants.len() {
        return Err(invalid(format!(
            "expected {} horses, got {}",
            round.participants.len(),
            order.len()
        )));
    }

    let mut seen = HashSet::new();
    for horse in order {
        if !round.has_participant(horse) {
            return Err(invalid(format!("{} is not running in this round", horse)));
        }
        if !seen.insert(horse) {
            return Err(invalid(format!("{} appears twice", horse)));
        }
    }
    Ok(())
}
