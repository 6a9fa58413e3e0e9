//! Base speed model
//!
//! One base speed per horse per race, from condition, surface affinity,
//! going and a small jitter. Not re-rolled during the race.

use rand::Rng;

use crate::core::config::SpeedConfig;
use crate::core::types::TrackCondition;
use crate::generation::Horse;

/// Linear map of `value` in [0, 1] onto [min, max]
pub fn affinity_to_multiplier(value: f64, min: f64, max: f64) -> f64 {
    min + (max - min) * value.clamp(0.0, 1.0)
}

/// Speed contribution from condition alone
pub fn condition_speed(condition: f64, config: &SpeedConfig) -> f64 {
    let lo = config.condition_clamp_min;
    let hi = config.condition_clamp_max;
    let ratio = (condition.clamp(lo, hi) - lo) / (hi - lo);
    config.base_speed_min + (config.base_speed_max - config.base_speed_min) * ratio
}

/// Base speed for `horse` on `track`
pub fn calculate_horse_speed<R: Rng + ?Sized>(
    horse: &Horse,
    track: &TrackCondition,
    config: &SpeedConfig,
    rng: &mut R,
) -> f64 {
    let condition = condition_speed(horse.current_condition, config);

    let affinity = horse.affinity(track.surface(), config.default_affinity);
    let affinity_mul =
        affinity_to_multiplier(affinity, config.affinity_mul_min, config.affinity_mul_max);

    let going = track.speed_multiplier();
    let jitter = if config.jitter_max > config.jitter_min {
        rng.gen_range(config.jitter_min..config.jitter_max)
    } else {
        config.jitter_min
    };

    let speed = condition * affinity_mul * going * jitter * config.speed_multiplier;
    speed.clamp(config.floor(), config.ceiling())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DirtCondition, HorseId, Surface, TurfCondition};
    use crate::generation::HslColor;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn horse(condition: f64, affinity: f64) -> Horse {
        Horse {
            id: HorseId::from_index(0),
            name: "Test Horse".into(),
            color: HslColor { hue: 0.0, saturation: 70.0, lightness: 50.0 },
            base_condition: condition,
            current_condition: condition,
            surface_affinity: Surface::ALL.iter().map(|s| (*s, affinity)).collect(),
            last_race_round: None,
        }
    }

    #[test]
    fn test_condition_clamped_below_45() {
        let config = SpeedConfig::default();
        assert_eq!(condition_speed(30.0, &config), config.base_speed_min);
        assert_eq!(condition_speed(45.0, &config), config.base_speed_min);
        assert_eq!(condition_speed(100.0, &config), config.base_speed_max);
    }

    #[test]
    fn test_affinity_multiplier_range() {
        assert_eq!(affinity_to_multiplier(0.0, 0.92, 1.12), 0.92);
        assert!((affinity_to_multiplier(1.0, 0.92, 1.12) - 1.12).abs() < 1e-12);
        assert_eq!(affinity_to_multiplier(2.0, 0.92, 1.12), affinity_to_multiplier(1.0, 0.92, 1.12));
    }

    #[test]
    fn test_speed_within_bounds_at_extremes() {
        let config = SpeedConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let tracks = [
            TrackCondition::Dirt(DirtCondition::Fast),
            TrackCondition::Turf(TurfCondition::Heavy),
        ];

        for condition in [30.0, 45.0, 100.0] {
            for affinity in [0.0, 1.0] {
                for track in &tracks {
                    for _ in 0..20 {
                        let s = calculate_horse_speed(&horse(condition, affinity), track, &config, &mut rng);
                        assert!(s >= config.floor() && s <= config.ceiling(), "speed {} out of bounds", s);
                    }
                }
            }
        }
    }

    #[test]
    fn test_fitter_horse_is_faster() {
        let config = SpeedConfig { jitter_min: 1.0, jitter_max: 1.0, ..SpeedConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let track = TrackCondition::Dirt(DirtCondition::Fast);

        let slow = calculate_horse_speed(&horse(60.0, 0.5), &track, &config, &mut rng);
        let fast = calculate_horse_speed(&horse(100.0, 0.5), &track, &config, &mut rng);
        assert!(fast > slow);
    }

    #[test]
    fn test_heavy_going_is_slower() {
        let config = SpeedConfig { jitter_min: 1.0, jitter_max: 1.0, ..SpeedConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let h = horse(100.0, 1.0);

        let firm = calculate_horse_speed(&h, &TrackCondition::Turf(TurfCondition::Firm), &config, &mut rng);
        let heavy = calculate_horse_speed(&h, &TrackCondition::Turf(TurfCondition::Heavy), &config, &mut rng);
        assert!(heavy < firm);
    }
}
