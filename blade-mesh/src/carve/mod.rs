//! Grooves and holes
//!
//! Carve specs are expressed in normalised blade space: length positions are
//! arc length ratios (0 at the base, 1 at the tip) and lateral positions are
//! ratios across the ring (0 at the left extent, 1 at the right).
//!
//! Grooves only displace vertices. Holes delete surface cells and close the
//! cut with synthesized walls.

mod groove;
mod hole;
mod mask;

pub use groove::{GrooveInput, carve_grooves, groove_depth_map, max_allowed_depth};
pub use hole::{CarvedHoles, HoleCarveInput, carve_holes, snap_padding};
pub use mask::{HoleMask, HoleMasks, build_hole_masks};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::curve::KeyframeCurve;

/// A depth deformation along part of the blade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrooveSpec {
    /// Start of the groove as a length ratio
    pub start: f32,
    /// End of the groove as a length ratio
    pub end: f32,
    /// Depth as a fraction of the local half-thickness
    pub depth: f32,
    /// Lateral half-extent as a ratio of ring width
    pub width: f32,
    /// Lateral center ratio
    pub center: f32,
    /// Depth multiplier by normalised distance from `center` (0..1)
    pub falloff: KeyframeCurve,
}

impl Default for GrooveSpec {
    fn default() -> Self {
        Self {
            start: 0.1,
            end: 0.8,
            depth: 0.3,
            width: 0.3,
            center: 0.5,
            falloff: KeyframeCurve::falloff(),
        }
    }
}

impl GrooveSpec {
    pub fn is_active(&self) -> bool {
        finite_range(self.start, self.end)
            && self.depth.is_finite()
            && self.depth > 0.0
            && self.width.is_finite()
            && self.width > 0.0
            && self.center.is_finite()
    }
}

/// A rectangular hole between two length ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandHoleSpec {
    pub start: f32,
    pub end: f32,
    /// Lateral half-extent as a ratio of ring width
    pub width: f32,
    /// Lateral center ratio
    pub center: f32,
}

impl Default for BandHoleSpec {
    fn default() -> Self {
        Self {
            start: 0.2,
            end: 0.5,
            width: 0.3,
            center: 0.5,
        }
    }
}

impl BandHoleSpec {
    pub fn is_active(&self) -> bool {
        finite_range(self.start, self.end)
            && self.width.is_finite()
            && self.width > 0.0
            && self.center.is_finite()
    }

    /// Whether `(length, lateral)` falls inside the band
    pub fn contains(&self, length: f32, lateral: f32) -> bool {
        length >= self.start && length <= self.end && (lateral - self.center).abs() <= self.width
    }
}

/// A round hole, measured in (length ratio, lateral ratio) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularHoleSpec {
    pub center_length: f32,
    pub center_lateral: f32,
    pub radius: f32,
}

impl Default for CircularHoleSpec {
    fn default() -> Self {
        Self {
            center_length: 0.4,
            center_lateral: 0.5,
            radius: 0.15,
        }
    }
}

impl CircularHoleSpec {
    /// Circle centered midway along `start..end`
    pub fn from_range(start: f32, end: f32, center_lateral: f32, radius: f32) -> Self {
        Self {
            center_length: (start + end) * 0.5,
            center_lateral,
            radius,
        }
    }

    pub fn is_active(&self) -> bool {
        self.center_length.is_finite()
            && self.center_lateral.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
    }

    pub fn contains(&self, length: f32, lateral: f32) -> bool {
        let dl = length - self.center_length;
        let dw = lateral - self.center_lateral;
        (dl * dl + dw * dw).sqrt() <= self.radius
    }
}

/// One carve, tagged by kind in presets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CarveSpec {
    #[default]
    None,
    Groove(GrooveSpec),
    BandHole(BandHoleSpec),
    CircularHole(CircularHoleSpec),
}

impl CarveSpec {
    /// False for `None` and for specs with non-positive extents
    pub fn is_active(&self) -> bool {
        match self {
            CarveSpec::None => false,
            CarveSpec::Groove(spec) => spec.is_active(),
            CarveSpec::BandHole(spec) => spec.is_active(),
            CarveSpec::CircularHole(spec) => spec.is_active(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            CarveSpec::None => "none",
            CarveSpec::Groove(_) => "groove",
            CarveSpec::BandHole(_) => "band_hole",
            CarveSpec::CircularHole(_) => "circular_hole",
        }
    }
}

fn finite_range(start: f32, end: f32) -> bool {
    start.is_finite() && end.is_finite() && end > start
}

/// Deterministic carve layout for `seed`
///
/// Identical seeds always produce identical specs.
pub fn random_carves(seed: u64, count: usize) -> Vec<CarveSpec> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..count)
        .map(|_| match rng.random_range(0..3u32) {
            0 => {
                let start = rng.random_range(0.05..0.4);
                CarveSpec::Groove(GrooveSpec {
                    start,
                    end: start + rng.random_range(0.2..0.5),
                    depth: rng.random_range(0.1..0.6),
                    width: rng.random_range(0.05..0.3),
                    center: rng.random_range(0.3..0.7),
                    falloff: KeyframeCurve::falloff(),
                })
            }
            1 => {
                let start = rng.random_range(0.1..0.5);
                CarveSpec::BandHole(BandHoleSpec {
                    start,
                    end: start + rng.random_range(0.05..0.3),
                    width: rng.random_range(0.05..0.2),
                    center: rng.random_range(0.35..0.65),
                })
            }
            _ => {
                let start = rng.random_range(0.1..0.6);
                CarveSpec::CircularHole(CircularHoleSpec::from_range(
                    start,
                    start + rng.random_range(0.05..0.2),
                    rng.random_range(0.35..0.65),
                    rng.random_range(0.05..0.15),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_specs() {
        assert!(!CarveSpec::None.is_active());
        let flat = GrooveSpec {
            depth: 0.0,
            ..Default::default()
        };
        assert!(!CarveSpec::Groove(flat).is_active());
        let inverted = BandHoleSpec {
            start: 0.5,
            end: 0.2,
            ..Default::default()
        };
        assert!(!CarveSpec::BandHole(inverted).is_active());
        let zero = CircularHoleSpec {
            radius: -0.1,
            ..Default::default()
        };
        assert!(!CarveSpec::CircularHole(zero).is_active());
        assert!(CarveSpec::Groove(GrooveSpec::default()).is_active());
    }

    #[test]
    fn test_circular_from_range_uses_midpoint() {
        let spec = CircularHoleSpec::from_range(0.2, 0.6, 0.5, 0.1);
        assert!((spec.center_length - 0.4).abs() < 1e-6);
        assert!(spec.contains(0.4, 0.55));
        assert!(!spec.contains(0.2, 0.5));
    }

    #[test]
    fn test_band_contains() {
        let spec = BandHoleSpec::default();
        assert!(spec.contains(0.3, 0.5));
        assert!(spec.contains(0.3, 0.75));
        assert!(!spec.contains(0.6, 0.5));
        assert!(!spec.contains(0.3, 0.85));
    }

    #[test]
    fn test_random_carves_are_deterministic() {
        let a = random_carves(42, 8);
        let b = random_carves(42, 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.iter().all(CarveSpec::is_active));
        assert_ne!(a, random_carves(43, 8));
    }

    #[test]
    fn test_carve_spec_toml() {
        let text = r#"
            [[carves]]
            kind = "band_hole"
            start = 0.2
            end = 0.5

            [[carves]]
            kind = "none"
        "#;

        #[derive(Deserialize)]
        struct Doc {
            carves: Vec<CarveSpec>,
        }

        let doc: Doc = toml::from_str(text).unwrap();
        assert_eq!(
            doc.carves[0],
            CarveSpec::BandHole(BandHoleSpec {
                start: 0.2,
                end: 0.5,
                ..Default::default()
            })
        );
        assert_eq!(doc.carves[1], CarveSpec::None);
    }
}
