//! Fatigue and recovery between races

use rand::Rng;

use crate::core::config::ConditionConfig;
use crate::core::types::RoundId;
use crate::generation::Horse;

/// Condition regained before racing in `round`
///
/// A horse that has never raced is treated as having rested
/// `never_raced_rest_rounds`, which at defaults is always the full cap.
pub fn recovery_amount(horse: &Horse, round: RoundId, config: &ConditionConfig) -> f64 {
    let rest = match horse.last_race_round {
        Some(last) => round.rounds_since(last),
        None => config.never_raced_rest_rounds,
    };
    (rest as f64 * config.recovery_per_round).min(config.max_recovery)
}

/// Recover a horse ahead of racing in `round` and mark it as racing there
pub fn apply_recovery(horse: &mut Horse, round: RoundId, config: &ConditionConfig) {
    let amount = recovery_amount(horse, round, config);
    horse.current_condition = (horse.current_condition + amount).min(config.ceiling);
    horse.last_race_round = Some(round);
}

/// Fatigue for finishing at `finish_index` (0 = winner) of `field_size`
///
/// Front runners pay most: `(field_size - finish_index) × penalty_per_rank`
/// plus uniform jitter.
pub fn finish_penalty<R: Rng + ?Sized>(
    finish_index: usize,
    field_size: usize,
    config: &ConditionConfig,
    rng: &mut R,
) -> f64 {
    let rank_penalty = field_size.saturating_sub(finish_index) as f64 * config.penalty_per_rank;
    let jitter = if config.penalty_jitter > 0.0 {
        rng.gen_range(0.0..config.penalty_jitter)
    } else {
        0.0
    };
    rank_penalty + jitter
}

/// Apply post-race fatigue, floored at `config.floor`
pub fn apply_finish_penalty<R: Rng + ?Sized>(
    horse: &mut Horse,
    finish_index: usize,
    field_size: usize,
    round: RoundId,
    config: &ConditionConfig,
    rng: &mut R,
) {
    let penalty = finish_penalty(finish_index, field_size, config, rng);
    horse.current_condition = (horse.current_condition - penalty).max(config.floor);
    horse.last_race_round = Some(round);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{HorseId, Surface};
    use crate::generation::HslColor;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn horse(condition: f64, last: Option<u32>) -> Horse {
        Horse {
            id: HorseId::from_index(0),
            name: "Test".into(),
            color: HslColor { hue: 0.0, saturation: 70.0, lightness: 50.0 },
            base_condition: condition,
            current_condition: condition,
            surface_affinity: Surface::ALL.iter().map(|s| (*s, 0.5)).collect(),
            last_race_round: last.map(RoundId),
        }
    }

    #[test]
    fn test_never_raced_gets_full_recovery() {
        let config = ConditionConfig::default();
        assert_eq!(recovery_amount(&horse(70.0, None), RoundId(1), &config), 20.0);
    }

    #[test]
    fn test_recovery_scales_with_rest() {
        let config = ConditionConfig::default();
        assert_eq!(recovery_amount(&horse(70.0, Some(2)), RoundId(3), &config), 5.0);
        assert_eq!(recovery_amount(&horse(70.0, Some(1)), RoundId(4), &config), 15.0);
        assert_eq!(recovery_amount(&horse(70.0, Some(1)), RoundId(6), &config), 20.0); // Capped
    }

    #[test]
    fn test_recovery_capped_at_ceiling() {
        let config = ConditionConfig::default();
        let mut h = horse(95.0, None);
        apply_recovery(&mut h, RoundId(1), &config);
        assert_eq!(h.current_condition, 100.0);
        assert_eq!(h.last_race_round, Some(RoundId(1)));
    }

    #[test]
    fn test_winner_pays_more_than_last() {
        let config = ConditionConfig { penalty_jitter: 0.0, ..ConditionConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(finish_penalty(0, 10, &config, &mut rng), 20.0);
        assert_eq!(finish_penalty(9, 10, &config, &mut rng), 2.0);
    }

    #[test]
    fn test_penalty_jitter_range() {
        let config = ConditionConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            let p = finish_penalty(4, 10, &config, &mut rng);
            assert!((12.0..17.0).contains(&p));
        }
    }

    #[test]
    fn test_penalty_floored() {
        let config = ConditionConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut h = horse(35.0, None);
        apply_finish_penalty(&mut h, 0, 10, RoundId(2), &config, &mut rng);
        assert_eq!(h.current_condition, 30.0);
        assert_eq!(h.last_race_round, Some(RoundId(2)));
    }
}
