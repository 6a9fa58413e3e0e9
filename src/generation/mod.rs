//! Entity generation: the horse pool and track conditions

pub mod colors;
pub mod horses;
pub mod names;
pub mod track;

pub use colors::{generate_unique_colors, HslColor};
pub use horses::{generate_horses, Horse};
pub use names::generate_horse_name;
pub use track::{generate_random_track, random_surface};
