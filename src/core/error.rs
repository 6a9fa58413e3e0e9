use thiserror::Error;

use crate::core::types::{HorseId, RoundId};

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("No distance defined for round {0}")]
    MissingDistance(u32),

    #[error("Not enough horses: need {needed}, pool has {available}")]
    InsufficientHorses { needed: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("Horse not found: {0}")]
    HorseNotFound(HorseId),

    #[error("Season incomplete, rounds without a result: {0:?}")]
    IncompleteSeason(Vec<RoundId>),

    #[error("Round {0} already has a result")]
    RoundAlreadyRun(RoundId),

    #[error("A race is already active for round {0}")]
    RaceAlreadyActive(RoundId),

    #[error("Invalid finish order for round {round}: {reason}")]
    InvalidFinishOrder { round: RoundId, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RaceError>;
