//! Race simulation: base speed, the per-tick engine and race ordering

pub mod clock;
pub mod engine;
pub mod events;
pub mod speed;
pub mod standings;

pub use clock::SimClock;
pub use engine::{RaceEngine, RacePhase, RaceState, TickOutcome};
pub use events::{RaceEvent, RaceEventKind, RaceEventLog, RaceObserver};
pub use speed::calculate_horse_speed;
pub use standings::{
    finish_order, is_podium, live_standings, ordinal, race_progress, race_statistics, RaceHorse,
    RaceStatistics, StandingEntry,
};
