//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock / simulated-clock timestamp in milliseconds
pub type Millis = u64;

/// Unique identifier for horses (`H01`..`H20`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HorseId(pub String);

impl HorseId {
    /// Sequential zero-padded id for the horse at `index` (0-based)
    pub fn from_index(index: usize) -> Self {
        Self(format!("H{:02}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HorseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HorseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Round identifier, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u32);

impl RoundId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Number of rounds between `earlier` and this round
    pub fn rounds_since(&self, earlier: RoundId) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Track material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Turf,
    Dirt,
    Hybrid,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Turf, Surface::Dirt, Surface::Hybrid];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Turf => "turf",
            Self::Dirt => "dirt",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirtCondition {
    Fast,
    Good,
    Wet,
    Muddy,
}

impl DirtCondition {
    pub const ALL: [DirtCondition; 4] = [Self::Fast, Self::Good, Self::Wet, Self::Muddy];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurfCondition {
    Firm,
    Good,
    Soft,
    Heavy,
}

impl TurfCondition {
    pub const ALL: [TurfCondition; 4] = [Self::Firm, Self::Good, Self::Soft, Self::Heavy];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HybridCondition {
    Standard,
    Fast,
    Wet,
}

impl HybridCondition {
    pub const ALL: [HybridCondition; 3] = [Self::Standard, Self::Fast, Self::Wet];
}

/// Track state, keyed by surface
///
/// Each surface carries its own condition enum, so a dirt track can never
/// be labelled with a turf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "surface", content = "condition", rename_all = "lowercase")]
pub enum TrackCondition {
    Dirt(DirtCondition),
    Turf(TurfCondition),
    Hybrid(HybridCondition),
}

impl TrackCondition {
    pub fn surface(&self) -> Surface {
        match self {
            Self::Dirt(_) => Surface::Dirt,
            Self::Turf(_) => Surface::Turf,
            Self::Hybrid(_) => Surface::Hybrid,
        }
    }

    pub fn condition_name(&self) -> &'static str {
        match self {
            Self::Dirt(DirtCondition::Fast) => "fast",
            Self::Dirt(DirtCondition::Good) => "good",
            Self::Dirt(DirtCondition::Wet) => "wet",
            Self::Dirt(DirtCondition::Muddy) => "muddy",
            Self::Turf(TurfCondition::Firm) => "firm",
            Self::Turf(TurfCondition::Good) => "good",
            Self::Turf(TurfCondition::Soft) => "soft",
            Self::Turf(TurfCondition::Heavy) => "heavy",
            Self::Hybrid(HybridCondition::Standard) => "standard",
            Self::Hybrid(HybridCondition::Fast) => "fast",
            Self::Hybrid(HybridCondition::Wet) => "wet",
        }
    }

    /// Speed multiplier for this surface/condition pair (1.0 = ideal going)
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Self::Dirt(DirtCondition::Fast) => 1.0,
            Self::Dirt(DirtCondition::Good) => 0.99,
            Self::Dirt(DirtCondition::Wet) => 0.97,
            Self::Dirt(DirtCondition::Muddy) => 0.95,
            Self::Turf(TurfCondition::Firm) => 1.0,
            Self::Turf(TurfCondition::Good) => 0.99,
            Self::Turf(TurfCondition::Soft) => 0.96,
            Self::Turf(TurfCondition::Heavy) => 0.94,
            Self::Hybrid(HybridCondition::Standard) => 1.0,
            Self::Hybrid(HybridCondition::Fast) => 1.0,
            Self::Hybrid(HybridCondition::Wet) => 0.98,
        }
    }

    /// Every valid track for a surface
    pub fn all_for(surface: Surface) -> Vec<TrackCondition> {
        match surface {
            Surface::Dirt => DirtCondition::ALL.iter().map(|c| Self::Dirt(*c)).collect(),
            Surface::Turf => TurfCondition::ALL.iter().map(|c| Self::Turf(*c)).collect(),
            Surface::Hybrid => HybridCondition::ALL.iter().map(|c| Self::Hybrid(*c)).collect(),
        }
    }
}

impl fmt::Display for TrackCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.surface(), self.condition_name())
    }
}
