//! Season scheduling
//!
//! The whole season is fixed up front: every round gets its distance, track
//! and field when the schedule is generated. Only `result` is written later.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SeasonConfig;
use crate::core::error::{RaceError, Result};
use crate::core::types::{HorseId, RoundId, Surface, TrackCondition};
use crate::generation::track::{generate_random_track, random_surface};
use crate::generation::Horse;

/// One scheduled race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// Meters
    pub distance: u32,
    pub surface: Surface,
    pub track: TrackCondition,
    /// Distinct runners, in lane order
    pub participants: Vec<HorseId>,
    /// Finish order, set once when the race finalizes
    pub result: Option<Vec<HorseId>>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_participant(&self, horse: &HorseId) -> bool {
        self.participants.contains(horse)
    }
}

/// Build every round of the season from the horse pool
pub fn generate_race_schedule<R: Rng + ?Sized>(
    horses: &[Horse],
    season: &SeasonConfig,
    rng: &mut R,
) -> Result<Vec<Round>> {
    if horses.len() < season.horses_per_round {
        return Err(RaceError::InsufficientHorses {
            needed: season.horses_per_round,
            available: horses.len(),
        });
    }

    let pool: Vec<HorseId> = horses.iter().map(|h| h.id.clone()).collect();
    let mut rounds = Vec::with_capacity(season.round_count);

    for i in 0..season.round_count {
        let number = i as u32 + 1;
        let distance = *season
            .round_distances
            .get(i)
            .ok_or(RaceError::MissingDistance(number))?;

        let surface = random_surface(rng);
        let track = generate_random_track(surface, rng);

        rounds.push(Round {
            id: RoundId(number),
            distance,
            surface,
            track,
            participants: select_participants(&pool, season.horses_per_round, rng),
            result: None,
        });
    }

    Ok(rounds)
}

/// Shuffle-and-take selection of distinct runners
fn select_participants<R: Rng + ?Sized>(
    pool: &[HorseId],
    count: usize,
    rng: &mut R,
) -> Vec<HorseId> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConditionConfig;
    use crate::generation::generate_horses;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn pool(rng: &mut ChaCha8Rng) -> Vec<Horse> {
        generate_horses(20, &SeasonConfig::default(), &ConditionConfig::default(), rng)
    }

    #[test]
    fn test_six_rounds_in_distance_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let horses = pool(&mut rng);
        let rounds = generate_race_schedule(&horses, &SeasonConfig::default(), &mut rng).unwrap();

        assert_eq!(rounds.len(), 6);
        let distances: Vec<u32> = rounds.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![1200, 1400, 1600, 1800, 2000, 2200]);
        let ids: Vec<u32> = rounds.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_participants_distinct_and_from_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let horses = pool(&mut rng);
        let ids: HashSet<&HorseId> = horses.iter().map(|h| &h.id).collect();
        let rounds = generate_race_schedule(&horses, &SeasonConfig::default(), &mut rng).unwrap();

        for round in &rounds {
            assert_eq!(round.participants.len(), 10);
            let unique: HashSet<&HorseId> = round.participants.iter().collect();
            assert_eq!(unique.len(), 10);
            assert!(round.participants.iter().all(|p| ids.contains(p)));
            assert_eq!(round.track.surface(), round.surface);
            assert!(round.result.is_none());
        }
    }

    #[test]
    fn test_short_distance_table_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let horses = pool(&mut rng);
        let season = SeasonConfig {
            round_distances: vec![1200, 1400, 1600],
            ..SeasonConfig::default()
        };

        let result = generate_race_schedule(&horses, &season, &mut rng);
        assert!(matches!(result, Err(RaceError::MissingDistance(4))));
    }

    #[test]
    fn test_small_pool_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let horses: Vec<Horse> = pool(&mut rng).into_iter().take(4).collect();
        let result = generate_race_schedule(&horses, &SeasonConfig::default(), &mut rng);
        assert!(matches!(
            result,
            Err(RaceError::InsufficientHorses { needed: 10, available: 4 })
        ));
    }
}
