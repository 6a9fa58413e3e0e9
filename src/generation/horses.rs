//! Horse pool generation

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::config::{ConditionConfig, SeasonConfig};
use crate::core::types::{HorseId, RoundId, Surface};
use crate::generation::colors::{generate_unique_colors, HslColor};
use crate::generation::names::generate_unique_name;

/// A horse in the season pool
///
/// Created once per season and never removed; only `current_condition` and
/// `last_race_round` change as the season runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub color: HslColor,
    /// Condition at generation, [60, 100]
    pub base_condition: f64,
    /// Fatigue-adjusted condition, [30, 100]
    pub current_condition: f64,
    /// Aptitude per surface, [0, 1]
    pub surface_affinity: AHashMap<Surface, f64>,
    pub last_race_round: Option<RoundId>,
}

impl Horse {
    /// Affinity for a surface, or `default` when the horse has no entry
    pub fn affinity(&self, surface: Surface, default: f64) -> f64 {
        self.surface_affinity.get(&surface).copied().unwrap_or(default)
    }
}

/// Generate up to `count` horses (capped at the configured pool size)
pub fn generate_horses<R: Rng + ?Sized>(
    count: usize,
    season: &SeasonConfig,
    condition: &ConditionConfig,
    rng: &mut R,
) -> Vec<Horse> {
    let n = count.min(season.horse_pool_size);
    let colors = generate_unique_colors(n, rng);
    let mut used_names = HashSet::new();

    colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| {
            let name = generate_unique_name(rng, &mut used_names);
            let base = rng.gen_range(condition.base_min..=condition.base_max) as f64;
            let surface_affinity = Surface::ALL
                .iter()
                .map(|surface| (*surface, rng.gen::<f64>()))
                .collect();

            Horse {
                id: HorseId::from_index(i),
                name,
                color,
                base_condition: base,
                current_condition: base,
                surface_affinity,
                last_race_round: None,
            }
        })
        .collect()
}
