pub mod config;
pub mod error;
pub mod types;

pub use config::RaceConfig;
pub use error::{RaceError, Result};
pub use types::{HorseId, Millis, RoundId, Surface, TrackCondition};
