//! Round points and the grand-final ranking

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::ScoringConfig;
use crate::core::error::{RaceError, Result};
use crate::core::types::{HorseId, RoundId};
use crate::generation::Horse;
use crate::schedule::Round;

/// Recorded finish order of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: RoundId,
    pub order: Vec<HorseId>,
}

/// Points each finisher earned in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPoints {
    pub round_id: RoundId,
    pub horse_points: Vec<(HorseId, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandFinalResult {
    pub horse_id: HorseId,
    pub total_points: u32,
    /// 1-based, contiguous
    pub final_position: usize,
}

/// Points table for every round that has a result
pub fn round_points(rounds: &[Round], scoring: &ScoringConfig) -> Vec<RoundPoints> {
    rounds
        .iter()
        .filter_map(|round| {
            let order = round.result.as_ref()?;
            Some(RoundPoints {
                round_id: round.id,
                horse_points: order
                    .iter()
                    .enumerate()
                    .map(|(i, horse)| (horse.clone(), scoring.points_for(i)))
                    .collect(),
            })
        })
        .collect()
}

/// Rounds still waiting for a result
pub fn incomplete_rounds(rounds: &[Round]) -> Vec<RoundId> {
    rounds.iter().filter(|r| r.result.is_none()).map(|r| r.id).collect()
}

/// Season ranking by total points
///
/// Fails while any round lacks a result. Exact ties keep pool order, so the
/// lower horse id wins a tie.
pub fn calculate_grand_final_results(
    rounds: &[Round],
    horses: &[Horse],
    scoring: &ScoringConfig,
) -> Result<Vec<GrandFinalResult>> {
    let missing = incomplete_rounds(rounds);
    if rounds.is_empty() || !missing.is_empty() {
        return Err(RaceError::IncompleteSeason(missing));
    }

    let mut totals: AHashMap<&HorseId, u32> = AHashMap::new();
    for table in round_points(rounds, scoring) {
        for (horse, points) in table.horse_points {
            if let Some(key) = horses.iter().map(|h| &h.id).find(|id| **id == horse) {
                *totals.entry(key).or_insert(0) += points;
            }
        }
    }

    // Pool order first, then a stable sort keeps it for exact ties
    let mut standings: Vec<(&HorseId, u32)> = horses
        .iter()
        .filter_map(|h| totals.get(&h.id).map(|total| (&h.id, *total)))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(standings
        .into_iter()
        .enumerate()
        .map(|(i, (horse_id, total_points))| GrandFinalResult {
            horse_id: horse_id.clone(),
            total_points,
            final_position: i + 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DirtCondition, Surface, TrackCondition};
    use crate::generation::HslColor;

    fn horse(i: usize) -> Horse {
        Horse {
            id: HorseId::from_index(i),
            name: format!("Horse {}", i),
            color: HslColor { hue: 0.0, saturation: 70.0, lightness: 50.0 },
            base_condition: 80.0,
            current_condition: 80.0,
            surface_affinity: Surface::ALL.iter().map(|s| (*s, 0.5)).collect(),
            last_race_round: None,
        }
    }

    fn round(id: u32, result: Option<Vec<&str>>) -> Round {
        let participants: Vec<HorseId> = vec!["H01".into(), "H02".into(), "H03".into()];
        Round {
            id: RoundId(id),
            distance: 1200,
            surface: Surface::Dirt,
            track: TrackCondition::Dirt(DirtCondition::Fast),
            participants,
            result: result.map(|r| r.into_iter().map(HorseId::from).collect()),
        }
    }

    #[test]
    fn test_incomplete_season_rejected() {
        let horses: Vec<Horse> = (0..3).map(horse).collect();
        let rounds = vec![round(1, Some(vec!["H01", "H02", "H03"])), round(2, None)];

        match calculate_grand_final_results(&rounds, &horses, &ScoringConfig::default()) {
            Err(RaceError::IncompleteSeason(missing)) => assert_eq!(missing, vec![RoundId(2)]),
            other => panic!("expected incomplete season, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_season_rejected() {
        let result = calculate_grand_final_results(&[], &[], &ScoringConfig::default());
        assert!(matches!(result, Err(RaceError::IncompleteSeason(_))));
    }

    #[test]
    fn test_points_summed_and_sorted() {
        let horses: Vec<Horse> = (0..3).map(horse).collect();
        let rounds = vec![
            round(1, Some(vec!["H03", "H01", "H02"])),
            round(2, Some(vec!["H03", "H02", "H01"])),
        ];

        let results = calculate_grand_final_results(&rounds, &horses, &ScoringConfig::default()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].horse_id.as_str(), "H03");
        assert_eq!(results[0].total_points, 20);
        let positions: Vec<usize> = results.iter().map(|r| r.final_position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_exact_tie_keeps_pool_order() {
        let horses: Vec<Horse> = (0..3).map(horse).collect();
        // H01 and H02 both score 9 + 10 = 19
        let rounds = vec![
            round(1, Some(vec!["H02", "H01", "H03"])),
            round(2, Some(vec!["H01", "H02", "H03"])),
        ];

        let results = calculate_grand_final_results(&rounds, &horses, &ScoringConfig::default()).unwrap();
        assert_eq!(results[0].horse_id.as_str(), "H01");
        assert_eq!(results[1].horse_id.as_str(), "H02");
        assert_eq!(results[0].total_points, results[1].total_points);
    }

    #[test]
    fn test_horses_that_never_raced_are_excluded() {
        let horses: Vec<Horse> = (0..5).map(horse).collect();
        let rounds = vec![round(1, Some(vec!["H01", "H02", "H03"]))];

        let results = calculate_grand_final_results(&rounds, &horses, &ScoringConfig::default()).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_round_points_table() {
        let rounds = vec![round(1, Some(vec!["H02", "H01", "H03"])), round(2, None)];
        let tables = round_points(&rounds, &ScoringConfig::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].horse_points[0], (HorseId::from("H02"), 10));
        assert_eq!(tables[0].horse_points[2], (HorseId::from("H03"), 8));
    }
}
