//! Race simulation engine
//!
//! Phases: Idle -> Countdown -> Running -> Finalizing -> Idle.
//!
//! Each tick: clamp dt -> ease world speed -> advance runners -> detect
//! finishers -> schedule finalize -> fire finalize when due.

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::MotionConfig;
use crate::core::types::{HorseId, Millis, RoundId, TrackCondition};
use crate::generation::Horse;
use crate::race::events::{RaceEventKind, RaceEventLog};
use crate::race::standings::{finish_order, RaceHorse};

/// Engine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RacePhase {
    #[default]
    Idle,
    Countdown, // Gates loading, positions frozen
    Running,
    Finalizing, // Everyone is home, waiting for the settle delay
}

/// Shared race state, owned by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    pub is_race_active: bool,
    pub is_paused: bool,
    pub current_race_horses: Vec<RaceHorse>,
    /// Meters
    pub race_distance: f64,
    pub race_start_time: Millis,
}

impl RaceState {
    pub fn all_finished(&self) -> bool {
        !self.current_race_horses.is_empty() && self.current_race_horses.iter().all(|h| h.is_finished)
    }

    pub fn finished_count(&self) -> usize {
        self.current_race_horses.iter().filter(|h| h.is_finished).count()
    }

    pub fn get(&self, horse: &HorseId) -> Option<&RaceHorse> {
        self.current_race_horses.iter().find(|h| &h.horse_id == horse)
    }
}

/// Deferred finalization, cancelable until it fires
#[derive(Debug, Clone)]
struct PendingFinalize {
    due_at: Millis,
    snapshot: Vec<RaceHorse>,
}

/// What a tick produced
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: RaceEventLog,
    /// Official order, present on the one tick the finalize step fires
    pub finalize: Option<Vec<HorseId>>,
}

/// Per-race simulation state that is not part of the shared store
#[derive(Debug, Clone)]
pub struct RaceEngine {
    motion: MotionConfig,
    phase: RacePhase,
    round: Option<RoundId>,
    countdown_complete: bool,
    has_finalized: bool,
    ticking: bool,
    last_tick: Millis,
    world_speed: f64,
    target_speed: f64,
    horse_delta: AHashMap<HorseId, f64>,
    horse_affinity: AHashMap<HorseId, f64>,
    pending: Option<PendingFinalize>,
}

impl RaceEngine {
    pub fn new(motion: MotionConfig) -> Self {
        Self {
            motion,
            phase: RacePhase::Idle,
            round: None,
            countdown_complete: false,
            has_finalized: false,
            ticking: false,
            last_tick: 0,
            world_speed: 0.0,
            target_speed: 0.0,
            horse_delta: AHashMap::new(),
            horse_affinity: AHashMap::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn round(&self) -> Option<RoundId> {
        self.round
    }

    pub fn is_countdown_complete(&self) -> bool {
        self.countdown_complete
    }

    pub fn has_finalized(&self) -> bool {
        self.has_finalized
    }

    /// Whether the periodic tick should be driven
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn world_speed(&self) -> f64 {
        self.world_speed
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    pub fn last_tick(&self) -> Millis {
        self.last_tick
    }

    pub fn finalize_due_at(&self) -> Option<Millis> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    pub fn horse_delta(&self, horse: &HorseId) -> Option<f64> {
        self.horse_delta.get(horse).copied()
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Arm the engine for a freshly started race
    pub fn begin(
        &mut self,
        round: RoundId,
        race: &RaceState,
        horses: &[Horse],
        track: &TrackCondition,
        now: Millis,
    ) {
        self.reset();
        self.round = Some(round);
        self.phase = RacePhase::Countdown;
        self.last_tick = now;

        let surface = track.surface();
        for rh in &race.current_race_horses {
            let affinity = horses
                .iter()
                .find(|h| h.id == rh.horse_id)
                .map(|h| h.affinity(surface, 1.0))
                .unwrap_or(1.0);
            self.horse_affinity.insert(rh.horse_id.clone(), affinity);
        }
    }

    /// Gates open. Returns false when there was no countdown to complete.
    pub fn complete_countdown<R: Rng + ?Sized>(
        &mut self,
        race: &RaceState,
        rng: &mut R,
        now: Millis,
    ) -> bool {
        if self.phase != RacePhase::Countdown || !race.is_race_active {
            return false;
        }

        self.countdown_complete = true;
        self.phase = RacePhase::Running;
        self.world_speed = self.motion.scroll_speed * self.motion.launch_fraction;
        self.target_speed = if race.is_paused { 0.0 } else { self.motion.scroll_speed };

        self.seed_deltas(race, rng);
        self.last_tick = now;
        self.start();
        true
    }

    fn seed_deltas<R: Rng + ?Sized>(&mut self, race: &RaceState, rng: &mut R) {
        self.horse_delta.clear();
        for rh in &race.current_race_horses {
            let d = self.motion.delta_min
                + rng.gen::<f64>() * (self.motion.delta_max - self.motion.delta_min);
            self.horse_delta.insert(rh.horse_id.clone(), d);
        }
    }

    /// Start the periodic tick (idempotent)
    pub fn start(&mut self) {
        self.ticking = true;
    }

    /// Stop the periodic tick and cancel a pending finalize (idempotent)
    pub fn stop(&mut self) {
        self.ticking = false;
        self.pending = None;
    }

    /// Re-arm the tick after `stop`
    ///
    /// A field that is already home gets its finalize scheduled again, so a
    /// stop during the settle delay never strands the race.
    pub fn restart(&mut self, race: &RaceState, now: Millis) -> RaceEventLog {
        let mut events = RaceEventLog::new();
        if !race.is_race_active || !self.countdown_complete || self.ticking {
            return events;
        }

        self.last_tick = now;
        self.start();
        if race.all_finished() {
            self.schedule_finalize(race, now, &mut events);
        }
        events
    }

    pub fn pause(&mut self) {
        self.target_speed = 0.0;
    }

    pub fn resume(&mut self, now: Millis) {
        if self.countdown_complete {
            self.target_speed = self.motion.scroll_speed;
        }
        // Re-anchor so the paused span never shows up as dt
        self.last_tick = now;
    }

    /// The race has been finalized or abandoned
    pub fn end(&mut self) {
        self.stop();
        self.phase = RacePhase::Idle;
        self.countdown_complete = false;
        self.target_speed = 0.0;
        self.horse_delta.clear();
        self.horse_affinity.clear();
    }

    /// Drop all per-race state (idempotent)
    pub fn reset(&mut self) {
        self.end();
        self.round = None;
        self.has_finalized = false;
        self.world_speed = 0.0;
    }

    /// Advance the race to `now`
    ///
    /// Safe to call in any state; anything but a running or finalizing race
    /// is a no-op.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        race: &mut RaceState,
        rng: &mut R,
        now: Millis,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if !self.ticking
            || !race.is_race_active
            || !self.countdown_complete
            || race.current_race_horses.is_empty()
            || matches!(self.phase, RacePhase::Idle | RacePhase::Countdown)
        {
            return outcome;
        }

        let dt = now.saturating_sub(self.last_tick).min(self.motion.max_dt_ms) as f64 / 1000.0;
        self.last_tick = now;

        let k = 1.0 - (-dt * self.motion.easing_rate).exp();
        self.world_speed += (self.target_speed - self.world_speed) * k;

        if !race.is_paused {
            self.advance(race, rng, dt, now, &mut outcome.events);

            if race.all_finished() {
                self.schedule_finalize(race, now, &mut outcome.events);
            }
        }

        if let Some(order) = self.fire_finalize_if_due(now) {
            outcome.finalize = Some(order);
        }

        outcome
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        race: &mut RaceState,
        rng: &mut R,
        dt: f64,
        now: Millis,
        events: &mut RaceEventLog,
    ) {
        let motion = &self.motion;
        let mut place = race.finished_count();

        for rh in &mut race.current_race_horses {
            let delta = self.horse_delta.entry(rh.horse_id.clone()).or_insert(0.0);
            if motion.delta_drift > 0.0 {
                let drift = rng.gen_range(-motion.delta_drift..=motion.delta_drift) * dt;
                *delta = (*delta + drift).clamp(motion.delta_min, motion.delta_max);
            }

            let affinity = self.horse_affinity.get(&rh.horse_id).copied().unwrap_or(1.0);
            let affinity_delta = (affinity - 1.0) * motion.affinity_delta_scale;

            let units_per_sec = self.world_speed + *delta + affinity_delta;
            let meters_per_sec = (units_per_sec / motion.units_per_meter).max(0.0);

            // Finished horses keep drifting forward for the run-out
            rh.position += meters_per_sec * dt;
            rh.current_speed = meters_per_sec;

            if !rh.is_finished && rh.position >= race.race_distance {
                rh.is_finished = true;
                rh.finish_time.get_or_insert(now);
                place += 1;
                tracing::debug!(horse = %rh.horse_id, place, "horse finished");
                events.push(
                    RaceEventKind::HorseFinished {
                        horse: rh.horse_id.clone(),
                        place,
                    },
                    now,
                );
            }
        }
    }

    fn schedule_finalize(&mut self, race: &RaceState, now: Millis, events: &mut RaceEventLog) {
        if self.has_finalized || self.pending.is_some() {
            return;
        }

        let due_at = now + self.motion.finalize_delay_ms;
        self.pending = Some(PendingFinalize {
            due_at,
            snapshot: race.current_race_horses.clone(),
        });
        self.phase = RacePhase::Finalizing;
        tracing::info!(round = ?self.round, due_at, "all horses home, finalize scheduled");
        events.push(RaceEventKind::AllFinished { finalize_at: due_at }, now);
    }

    fn fire_finalize_if_due(&mut self, now: Millis) -> Option<Vec<HorseId>> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.due_at);
        if !due || self.has_finalized {
            return None;
        }

        let pending = self.pending.take()?;
        self.has_finalized = true;
        Some(finish_order(&pending.snapshot))
    }
}
