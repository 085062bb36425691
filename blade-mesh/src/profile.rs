//! Cross-section profiles
//!
//! Stateless functions mapping a lateral position to a half-thickness, and
//! height-ranged layers of those shapes blended into one profile.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::curve::{ControlCurve, KeyframeCurve};
use crate::math::{lerp, smoothstep};

/// Exponent of the hollow-ground concave falloff
const HOLLOW_GROUND_POWER: f32 = 2.0;

/// Lateral fraction of the hexagonal profile's flat center band
const HEXAGONAL_FLAT_BAND: f32 = 0.5;

/// Closed-form cross-section shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Constant thickness
    #[default]
    Flat,
    /// Cosine lens, thickest at the spine
    Lenticular,
    /// Linear ridge down the spine
    Diamond,
    /// Concave grind, thins quickly away from the spine
    HollowGround,
    /// Flat center band with linear bevels
    Hexagonal,
    /// Single-sided grind, thick at the left extent
    Wedge,
    /// Linear ridge whose width converges toward zero
    Triangular,
}

impl ProfileKind {
    /// All kinds, in declaration order
    pub const ALL: [ProfileKind; 7] = [
        ProfileKind::Flat,
        ProfileKind::Lenticular,
        ProfileKind::Diamond,
        ProfileKind::HollowGround,
        ProfileKind::Hexagonal,
        ProfileKind::Wedge,
        ProfileKind::Triangular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Flat => "flat",
            ProfileKind::Lenticular => "lenticular",
            ProfileKind::Diamond => "diamond",
            ProfileKind::HollowGround => "hollow_ground",
            ProfileKind::Hexagonal => "hexagonal",
            ProfileKind::Wedge => "wedge",
            ProfileKind::Triangular => "triangular",
        }
    }

    /// Whether the shape is mirror-symmetric around the spine
    pub fn is_symmetric(&self) -> bool {
        !matches!(self, ProfileKind::Wedge)
    }
}

/// Half-thickness of `kind` at lateral position `lateral_t`
///
/// `lateral_t` runs from -1 at the left extent through 0 at the spine to +1
/// at the right extent; values outside are clamped.
pub fn evaluate_half_thickness(kind: ProfileKind, lateral_t: f32, half_thickness: f32) -> f32 {
    let t = lateral_t.clamp(-1.0, 1.0);
    let a = t.abs();
    let shape = match kind {
        ProfileKind::Flat => 1.0,
        ProfileKind::Lenticular => (a * FRAC_PI_2).cos(),
        ProfileKind::Diamond | ProfileKind::Triangular => 1.0 - a,
        ProfileKind::HollowGround => (1.0 - a).powf(HOLLOW_GROUND_POWER),
        ProfileKind::Hexagonal => ((1.0 - a) / HEXAGONAL_FLAT_BAND).min(1.0),
        ProfileKind::Wedge => (1.0 - t) * 0.5,
    };
    half_thickness * shape.max(0.0)
}

/// Lateral narrowing (<1) or widening (>1) constant of `kind`
pub fn width_scale(kind: ProfileKind) -> f32 {
    match kind {
        ProfileKind::HollowGround => 0.95,
        ProfileKind::Triangular => 0.0,
        _ => 1.0,
    }
}

/// A height-ranged cross-section shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSectionLayer {
    pub kind: ProfileKind,
    /// Start of the layer as a ratio of blade length
    pub start_height: f32,
    /// End of the layer as a ratio of blade length
    pub end_height: f32,
    /// Influence of the layer's width scale across its own height range
    pub blend_curve: KeyframeCurve,
    /// Multiplier on the evaluated half-thickness
    pub scale: f32,
}

impl Default for CrossSectionLayer {
    fn default() -> Self {
        Self {
            kind: ProfileKind::Flat,
            start_height: 0.0,
            end_height: 1.0,
            blend_curve: KeyframeCurve::linear(),
            scale: 1.0,
        }
    }
}

impl CrossSectionLayer {
    pub fn new(kind: ProfileKind, start_height: f32, end_height: f32) -> Self {
        Self {
            kind,
            start_height,
            end_height,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_blend_curve(mut self, curve: KeyframeCurve) -> Self {
        self.blend_curve = curve;
        self
    }

    /// True when `height_t` lies inside `[start_height, end_height]`
    pub fn contains(&self, height_t: f32) -> bool {
        height_t >= self.start_height && height_t <= self.end_height
    }

    /// Position of `height_t` inside the layer, 0 at start and 1 at end
    pub fn local_height(&self, height_t: f32) -> f32 {
        let span = self.end_height - self.start_height;
        if span <= f32::EPSILON {
            return 0.0;
        }
        ((height_t - self.start_height) / span).clamp(0.0, 1.0)
    }

    /// Overlap weight, ramping to zero over `blend_zone` near either end
    fn overlap_weight(&self, height_t: f32, blend_zone: f32) -> f32 {
        if blend_zone <= 0.0 {
            return 1.0;
        }
        smoothstep(0.0, blend_zone, height_t - self.start_height)
            * smoothstep(0.0, blend_zone, self.end_height - height_t)
    }
}

/// Weights of the layers active at `height_t`, normalised to sum to 1
///
/// Falls back to uniform weights when every candidate sits on its own edge.
fn active_weights<'a>(
    layers: &'a [CrossSectionLayer],
    height_t: f32,
    blend_zone: f32,
) -> Vec<(&'a CrossSectionLayer, f32)> {
    let mut active: Vec<(&CrossSectionLayer, f32)> = layers
        .iter()
        .filter(|layer| layer.contains(height_t))
        .map(|layer| (layer, layer.overlap_weight(height_t, blend_zone)))
        .collect();

    let total: f32 = active.iter().map(|(_, w)| w).sum();
    let count = active.len() as f32;
    for (_, weight) in &mut active {
        *weight = if total > 1e-6 { *weight / total } else { 1.0 / count };
    }
    active
}

/// Half-thickness at `(height_t, lateral_t)` for a stack of layers
///
/// With no layer covering `height_t` the nominal half-thickness is returned
/// unchanged. One layer returns its own scaled shape. Overlapping layers are
/// averaged with weights that fade out near each layer's own boundaries, so
/// crossing into or out of an overlap does not produce a seam.
pub fn blend_thickness_at_overlap(
    layers: &[CrossSectionLayer],
    height_t: f32,
    lateral_t: f32,
    half_thickness: f32,
    blend_zone: f32,
) -> f32 {
    let active = active_weights(layers, height_t, blend_zone);
    match active.as_slice() {
        [] => half_thickness,
        [(layer, _)] => evaluate_half_thickness(layer.kind, lateral_t, half_thickness) * layer.scale,
        _ => active
            .iter()
            .map(|(layer, weight)| {
                evaluate_half_thickness(layer.kind, lateral_t, half_thickness)
                    * layer.scale
                    * weight
            })
            .sum(),
    }
}

/// Width multiplier at `height_t`
///
/// Each active layer moves from 1 toward its kind's [`width_scale`] following
/// its blend curve sampled at the layer-local height.
pub fn blend_width_scale(layers: &[CrossSectionLayer], height_t: f32, blend_zone: f32) -> f32 {
    let active = active_weights(layers, height_t, blend_zone);
    if active.is_empty() {
        return 1.0;
    }
    active
        .iter()
        .map(|(layer, weight)| {
            let influence = layer
                .blend_curve
                .sample(layer.local_height(height_t))
                .clamp(0.0, 1.0);
            lerp(1.0, width_scale(layer.kind), influence) * weight
        })
        .sum()
}
