//! Distinct display colours for horses
//!
//! The hue circle is split into equal sectors, one per horse, with a little
//! jitter so two seasons never look identical.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum hue jitter within a sector (degrees)
pub const HUE_JITTER: f64 = 15.0;

/// HSL colour token, rendered as `hsl(h, s%, l%)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    /// Hue in degrees, [0, 360)
    pub hue: f64,
    /// Saturation percent, [60, 80]
    pub saturation: f64,
    /// Lightness percent, [45, 60]
    pub lightness: f64,
}

impl HslColor {
    pub fn is_valid(&self) -> bool {
        (0.0..360.0).contains(&self.hue)
            && (0.0..=100.0).contains(&self.saturation)
            && (0.0..=100.0).contains(&self.lightness)
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {:.1}%, {:.1}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Generate `count` colours, one per equal hue sector
pub fn generate_unique_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<HslColor> {
    if count == 0 {
        return Vec::new();
    }

    let step = 360.0 / count as f64;
    (0..count)
        .map(|i| {
            let hue = (i as f64 * step + rng.gen::<f64>() * HUE_JITTER) % 360.0;
            HslColor {
                hue,
                saturation: 60.0 + rng.gen::<f64>() * 20.0,
                lightness: 45.0 + rng.gen::<f64>() * 15.0,
            }
        })
        .collect()
}
