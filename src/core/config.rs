//! Race and season configuration with documented constants
//!
//! All tunable numbers are collected here. Every section is `#[serde(default)]`
//! so a TOML file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{RaceError, Result};

/// Season shape: pool size, field size and the fixed distance sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Horses generated per season
    pub horse_pool_size: usize,

    /// Runners drawn into every round
    pub horses_per_round: usize,

    /// Number of rounds in a season
    pub round_count: usize,

    /// Distance (meters) of each round, in running order
    ///
    /// Must have at least `round_count` entries; the scheduler refuses to
    /// build a season otherwise.
    pub round_distances: Vec<u32>,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            horse_pool_size: 20,
            horses_per_round: 10,
            round_count: 6,
            round_distances: vec![1200, 1400, 1600, 1800, 2000, 2200],
        }
    }
}

/// Horse condition: generation range, fatigue and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    /// Lowest generated base condition
    pub base_min: u32,

    /// Highest generated base condition
    pub base_max: u32,

    /// Condition never drops below this after a race
    pub floor: f64,

    /// Condition never recovers above this
    pub ceiling: f64,

    /// Condition regained per round of rest
    pub recovery_per_round: f64,

    /// Cap on condition regained before a single race
    pub max_recovery: f64,

    /// Rest assumed for a horse that has never raced
    ///
    /// At default (6 rounds × 5) this always yields the full `max_recovery`.
    pub never_raced_rest_rounds: u32,

    /// Penalty per rank from the back: the winner of a 10-horse field
    /// loses `10 × penalty_per_rank`, last place loses `1 × penalty_per_rank`
    pub penalty_per_rank: f64,

    /// Extra uniform penalty in `[0, penalty_jitter)`
    pub penalty_jitter: f64,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            base_min: 60,
            base_max: 100,
            floor: 30.0,
            ceiling: 100.0,
            recovery_per_round: 5.0,
            max_recovery: 20.0,
            never_raced_rest_rounds: 6,
            penalty_per_rank: 2.0,
            penalty_jitter: 5.0,
        }
    }
}

/// Base speed model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Condition is clamped into this range before mapping to speed
    pub condition_clamp_min: f64,
    pub condition_clamp_max: f64,

    /// Speed range the clamped condition maps onto
    pub base_speed_min: f64,
    pub base_speed_max: f64,

    /// Multiplier range for surface affinity 0.0 .. 1.0
    pub affinity_mul_min: f64,
    pub affinity_mul_max: f64,

    /// Affinity used when a horse has no entry for the surface
    pub default_affinity: f64,

    /// Per-race jitter range
    pub jitter_min: f64,
    pub jitter_max: f64,

    /// Global scale applied after all factors
    pub speed_multiplier: f64,

    /// Absolute bounds before scaling (final bounds are these × `speed_multiplier`)
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            condition_clamp_min: 45.0,
            condition_clamp_max: 100.0,
            base_speed_min: 4.3,
            base_speed_max: 5.6,
            affinity_mul_min: 0.92,
            affinity_mul_max: 1.12,
            default_affinity: 0.5,
            jitter_min: 0.99,
            jitter_max: 1.02,
            speed_multiplier: 1.5,
            min_speed: 3.8,
            max_speed: 6.8,
        }
    }
}

impl SpeedConfig {
    /// Lowest speed the model can return
    pub fn floor(&self) -> f64 {
        self.min_speed * self.speed_multiplier
    }

    /// Highest speed the model can return
    pub fn ceiling(&self) -> f64 {
        self.max_speed * self.speed_multiplier
    }
}

/// Per-tick motion model
///
/// Speeds here are in display units per second; `units_per_meter` converts
/// them to meters of race distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Nominal tick period
    pub tick_ms: u64,

    /// Elapsed time per tick is clamped to this to absorb stalls
    pub max_dt_ms: u64,

    /// Shared scroll speed once the race is running
    pub scroll_speed: f64,

    pub units_per_meter: f64,

    /// Fraction of `scroll_speed` the field launches at when the gates open
    pub launch_fraction: f64,

    /// Exponential easing rate of the world speed toward its target (1/s)
    pub easing_rate: f64,

    /// Range of the per-horse speed delta
    pub delta_min: f64,
    pub delta_max: f64,

    /// Max change of a horse's delta per second of race time
    pub delta_drift: f64,

    /// Scale of the surface-affinity correction term
    pub affinity_delta_scale: f64,

    /// Settle time between the last horse finishing and finalization
    pub finalize_delay_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            max_dt_ms: 100,
            scroll_speed: 150.0,
            units_per_meter: 2.0,
            launch_fraction: 0.1,
            easing_rate: 11.0,
            delta_min: -2.0,
            delta_max: 2.0,
            delta_drift: 1.0,
            affinity_delta_scale: 0.5,
            finalize_delay_ms: 2000,
        }
    }
}

/// Points awarded per finishing place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub first_place_points: u32,
    pub points_step: u32,
    pub min_points: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            first_place_points: 10,
            points_step: 1,
            min_points: 1,
        }
    }
}

impl ScoringConfig {
    /// Points for a 0-based finishing index
    pub fn points_for(&self, finish_index: usize) -> u32 {
        let drop = (finish_index as u32).saturating_mul(self.points_step);
        self.first_place_points
            .saturating_sub(drop)
            .max(self.min_points)
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub season: SeasonConfig,
    pub condition: ConditionConfig,
    pub speed: SpeedConfig,
    pub motion: MotionConfig,
    pub scoring: ScoringConfig,
}

impl RaceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let season = &self.season;
        if season.round_distances.len() < season.round_count {
            return Err(RaceError::InvalidConfig(format!(
                "round_distances has {} entries, round_count is {}",
                season.round_distances.len(),
                season.round_count
            )));
        }

        if season.horses_per_round > season.horse_pool_size {
            return Err(RaceError::InvalidConfig(format!(
                "horses_per_round ({}) exceeds horse_pool_size ({})",
                season.horses_per_round, season.horse_pool_size
            )));
        }

        let cond = &self.condition;
        if cond.base_min > cond.base_max {
            return Err(RaceError::InvalidConfig(format!(
                "condition.base_min ({}) > condition.base_max ({})",
                cond.base_min, cond.base_max
            )));
        }
        if cond.floor > cond.ceiling {
            return Err(RaceError::InvalidConfig(format!(
                "condition.floor ({}) > condition.ceiling ({})",
                cond.floor, cond.ceiling
            )));
        }

        let speed = &self.speed;
        if speed.condition_clamp_min >= speed.condition_clamp_max {
            return Err(RaceError::InvalidConfig(
                "speed.condition_clamp_min must be < condition_clamp_max".into(),
            ));
        }
        if speed.jitter_min > speed.jitter_max
            || speed.min_speed > speed.max_speed
            || speed.base_speed_min > speed.base_speed_max
            || speed.affinity_mul_min > speed.affinity_mul_max
        {
            return Err(RaceError::InvalidConfig("speed ranges must not be inverted".into()));
        }
        if !(speed.speed_multiplier.is_finite() && speed.speed_multiplier > 0.0) {
            return Err(RaceError::InvalidConfig(format!(
                "speed.speed_multiplier must be finite and positive, got {}",
                speed.speed_multiplier
            )));
        }

        let motion = &self.motion;
        if motion.tick_ms == 0 || motion.max_dt_ms == 0 {
            return Err(RaceError::InvalidConfig("motion tick periods must be positive".into()));
        }
        if motion.scroll_speed <= 0.0 || motion.units_per_meter <= 0.0 {
            return Err(RaceError::InvalidConfig(
                "motion.scroll_speed and units_per_meter must be positive".into(),
            ));
        }
        if [motion.easing_rate, motion.launch_fraction].iter().any(|v| v.is_nan() || *v < 0.0) {
            return Err(RaceError::InvalidConfig(
                "motion.easing_rate and launch_fraction must not be negative".into(),
            ));
        }
        if motion.delta_min > motion.delta_max {
            return Err(RaceError::InvalidConfig("motion delta range is inverted".into()));
        }

        Ok(())
    }
}
