//! Generation configuration
//!
//! Everything a generation call needs besides the skeleton. All sections
//! default sensibly so presets only need to list what they change.

use serde::{Deserialize, Serialize};

use crate::carve::CarveSpec;
use crate::error::BladeError;
use crate::profile::CrossSectionLayer;

/// Mesh density preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

/// Subdivision counts and bevel constant derived from a [`Quality`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Subdivisions of each interior skeleton interval
    pub segment_subdivisions: u32,
    /// Subdivisions of the final interval into the tip
    pub tip_subdivisions: u32,
    /// Lateral samples per ring, left to right inclusive
    pub width_subdivisions: u32,
    /// Fraction of the edge half-thickness kept at the bevel ridge
    pub bevel_smoothness: f32,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Low, Quality::Medium, Quality::High, Quality::Ultra];

    pub fn settings(&self) -> QualitySettings {
        match self {
            Quality::Low => QualitySettings {
                segment_subdivisions: 2,
                tip_subdivisions: 3,
                width_subdivisions: 5,
                bevel_smoothness: 0.0,
            },
            Quality::Medium => QualitySettings {
                segment_subdivisions: 4,
                tip_subdivisions: 6,
                width_subdivisions: 9,
                bevel_smoothness: 0.1,
            },
            Quality::High => QualitySettings {
                segment_subdivisions: 8,
                tip_subdivisions: 10,
                width_subdivisions: 17,
                bevel_smoothness: 0.2,
            },
            Quality::Ultra => QualitySettings {
                segment_subdivisions: 16,
                tip_subdivisions: 16,
                width_subdivisions: 33,
                bevel_smoothness: 0.25,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Ultra => "ultra",
        }
    }
}

/// Which lateral extents carry the sharpened edge submesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpSide {
    Left,
    Right,
    #[default]
    Both,
}

impl SharpSide {
    pub fn is_sharp(&self, right: bool) -> bool {
        match self {
            SharpSide::Left => !right,
            SharpSide::Right => right,
            SharpSide::Both => true,
        }
    }
}

/// Full generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeConfig {
    /// Density preset (default: medium)
    #[serde(default)]
    pub quality: Quality,
    /// Overrides the quality preset's interior subdivisions
    #[serde(default)]
    pub segment_subdivisions: Option<u32>,
    /// Overrides the quality preset's tip subdivisions
    #[serde(default)]
    pub tip_subdivisions: Option<u32>,
    /// Overrides the quality preset's lateral samples
    #[serde(default)]
    pub width_subdivisions: Option<u32>,
    /// Stacked cross-section layers (empty: flat)
    #[serde(default)]
    pub layers: Vec<CrossSectionLayer>,
    /// Height span over which overlapping layers fade (default: 0.1)
    #[serde(default = "default_overlap_blend")]
    pub overlap_blend: f32,
    /// Full blade thickness at the spine (default: 0.04)
    #[serde(default = "default_thickness")]
    pub thickness: f32,
    /// Ridge offset of a sharpened edge (default: 0.01)
    #[serde(default = "default_edge_sharpness")]
    pub edge_sharpness: f32,
    /// Ridge offset of an unsharpened edge (default: 0.002)
    #[serde(default = "default_spine_thickness")]
    pub spine_thickness: f32,
    /// Lateral ratio of the spine between left (0) and right (1) (default: 0.5)
    #[serde(default = "default_spine_offset")]
    pub spine_offset: f32,
    /// Fade collapsed extents in and out along an interval (default: true)
    #[serde(default = "default_true")]
    pub collapse_edges: bool,
    /// Sharpened side(s) (default: both)
    #[serde(default)]
    pub sharp_side: SharpSide,
    /// Grooves and holes
    #[serde(default)]
    pub carves: Vec<CarveSpec>,
    /// Intermediate rows of each hole wall (default: 2)
    #[serde(default = "default_hole_wall_segments")]
    pub hole_wall_segments: u32,
    /// Exponent of the thickness fade into the tip (default: 0.6)
    #[serde(default = "default_tip_fade_power")]
    pub tip_fade_power: f32,
}

impl Default for BladeConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            segment_subdivisions: None,
            tip_subdivisions: None,
            width_subdivisions: None,
            layers: Vec::new(),
            overlap_blend: default_overlap_blend(),
            thickness: default_thickness(),
            edge_sharpness: default_edge_sharpness(),
            spine_thickness: default_spine_thickness(),
            spine_offset: default_spine_offset(),
            collapse_edges: true,
            sharp_side: SharpSide::default(),
            carves: Vec::new(),
            hole_wall_segments: default_hole_wall_segments(),
            tip_fade_power: default_tip_fade_power(),
        }
    }
}

fn default_overlap_blend() -> f32 {
    0.1
}

fn default_thickness() -> f32 {
    0.04
}

fn default_edge_sharpness() -> f32 {
    0.01
}

fn default_spine_thickness() -> f32 {
    0.002
}

fn default_spine_offset() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_hole_wall_segments() -> u32 {
    2
}

fn default_tip_fade_power() -> f32 {
    0.6
}

impl BladeConfig {
    /// Quality settings with the per-field overrides applied
    pub fn resolved_settings(&self) -> QualitySettings {
        let base = self.quality.settings();
        QualitySettings {
            segment_subdivisions: self
                .segment_subdivisions
                .unwrap_or(base.segment_subdivisions),
            tip_subdivisions: self.tip_subdivisions.unwrap_or(base.tip_subdivisions),
            width_subdivisions: self.width_subdivisions.unwrap_or(base.width_subdivisions),
            bevel_smoothness: base.bevel_smoothness,
        }
    }

    /// Check the configuration for values generation would have to clamp
    ///
    /// Generation never fails on these; this lets a host surface them.
    pub fn validate(&self) -> Result<(), BladeError> {
        let settings = self.resolved_settings();
        for (field, value) in [
            ("segment_subdivisions", settings.segment_subdivisions),
            ("tip_subdivisions", settings.tip_subdivisions),
        ] {
            if value == 0 {
                return Err(BladeError::InvalidSubdivisions { field, value });
            }
        }
        if settings.width_subdivisions < 2 {
            return Err(BladeError::InvalidSubdivisions {
                field: "width_subdivisions",
                value: settings.width_subdivisions,
            });
        }

        for (index, layer) in self.layers.iter().enumerate() {
            let in_unit = |v: f32| (0.0..=1.0).contains(&v);
            if !in_unit(layer.start_height)
                || !in_unit(layer.end_height)
                || layer.start_height > layer.end_height
            {
                return Err(BladeError::InvalidLayerRange {
                    index,
                    start: layer.start_height,
                    end: layer.end_height,
                });
            }
        }

        for (field, value) in [
            ("thickness", self.thickness),
            ("edge_sharpness", self.edge_sharpness),
            ("spine_thickness", self.spine_thickness),
            ("overlap_blend", self.overlap_blend),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BladeError::InvalidScalar { field, value });
            }
        }

        Ok(())
    }
}
