//! Random track conditions

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{DirtCondition, HybridCondition, Surface, TrackCondition, TurfCondition};

/// Uniformly pick a surface
pub fn random_surface<R: Rng + ?Sized>(rng: &mut R) -> Surface {
    Surface::ALL[rng.gen_range(0..Surface::ALL.len())]
}

/// Uniformly pick a condition from the surface's own set
pub fn generate_random_track<R: Rng + ?Sized>(surface: Surface, rng: &mut R) -> TrackCondition {
    // `choose` only fails on empty slices; every condition set is non-empty
    match surface {
        Surface::Dirt => TrackCondition::Dirt(
            *DirtCondition::ALL.choose(rng).unwrap_or(&DirtCondition::Fast),
        ),
        Surface::Turf => TrackCondition::Turf(
            *TurfCondition::ALL.choose(rng).unwrap_or(&TurfCondition::Firm),
        ),
        Surface::Hybrid => TrackCondition::Hybrid(
            *HybridCondition::ALL.choose(rng).unwrap_or(&HybridCondition::Standard),
        ),
    }
}
