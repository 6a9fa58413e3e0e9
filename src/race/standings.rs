//! Finish ordering, live standings and race statistics

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::types::{HorseId, Millis};
use crate::generation::{Horse, HslColor};

/// A runner in the active race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceHorse {
    pub horse_id: HorseId,
    /// Meters covered; keeps growing a little after the finish
    pub position: f64,
    /// Base speed snapshot taken at race start
    pub speed: f64,
    /// Last effective speed, meters per second
    pub current_speed: f64,
    pub is_finished: bool,
    /// Stamped once, on the tick the horse crossed the line
    pub finish_time: Option<Millis>,
}

impl RaceHorse {
    pub fn new(horse_id: HorseId, speed: f64) -> Self {
        Self {
            horse_id,
            position: 0.0,
            speed,
            current_speed: speed,
            is_finished: false,
            finish_time: None,
        }
    }
}

/// Race order: finishers by finish time, then the rest by distance covered
///
/// Trailing position after the line is never used to break ties between two
/// finishers.
///
/// `finish_time` is the tick timestamp, so horses crossing on the same tick
/// compare equal. A stable sort then leaves them in lane (participant) order.
pub fn compare_race_order(a: &RaceHorse, b: &RaceHorse) -> Ordering {
    match (a.finish_time, b.finish_time) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.position.total_cmp(&a.position),
    }
}

/// Official finish order of a race snapshot
pub fn finish_order(horses: &[RaceHorse]) -> Vec<HorseId> {
    let mut sorted: Vec<&RaceHorse> = horses.iter().collect();
    sorted.sort_by(|a, b| compare_race_order(a, b));
    sorted.into_iter().map(|h| h.horse_id.clone()).collect()
}

/// Progress of the leader, percent of race distance
pub fn race_progress(horses: &[RaceHorse], race_distance: f64) -> f64 {
    if race_distance <= 0.0 || horses.is_empty() {
        return 0.0;
    }
    let lead = horses.iter().map(|h| h.position).fold(0.0_f64, f64::max);
    (lead / race_distance * 100.0).clamp(0.0, 100.0)
}

/// One line of the live leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub horse_id: HorseId,
    /// 1-based place
    pub place: usize,
    pub name: String,
    pub color: Option<HslColor>,
    pub is_finished: bool,
    pub finish_time: Option<Millis>,
}

/// Top `limit` runners in race order
pub fn live_standings(race_horses: &[RaceHorse], horses: &[Horse], limit: usize) -> Vec<StandingEntry> {
    let mut sorted: Vec<&RaceHorse> = race_horses.iter().collect();
    sorted.sort_by(|a, b| compare_race_order(a, b));

    sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, rh)| {
            let horse = horses.iter().find(|h| h.id == rh.horse_id);
            StandingEntry {
                horse_id: rh.horse_id.clone(),
                place: i + 1,
                name: horse.map(|h| h.name.clone()).unwrap_or_else(|| "Unknown".into()),
                color: horse.map(|h| h.color),
                is_finished: rh.is_finished,
                finish_time: rh.finish_time,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceStatistics {
    pub total_horses: usize,
    pub finished_horses: usize,
    pub race_progress: f64,
    pub average_position: f64,
}

pub fn race_statistics(race_horses: &[RaceHorse], race_distance: f64) -> RaceStatistics {
    let total = race_horses.len();
    let average_position = if total > 0 {
        race_horses.iter().map(|h| h.position).sum::<f64>() / total as f64
    } else {
        0.0
    };

    RaceStatistics {
        total_horses: total,
        finished_horses: race_horses.iter().filter(|h| h.is_finished).count(),
        race_progress: race_progress(race_horses, race_distance),
        average_position,
    }
}

/// "1st", "2nd", "3rd", "4th" ...
pub fn ordinal(place: usize) -> String {
    let suffix = match place {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", place, suffix)
}

pub fn is_podium(place: usize) -> bool {
    (1..=3).contains(&place)
}
