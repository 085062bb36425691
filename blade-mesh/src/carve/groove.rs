//! Groove carving
//!
//! Grooves build a depth map over the ring grid, smooth it along the blade and
//! then squeeze the front and back faces toward each other by that depth.

use tracing::debug;

use super::{CarveSpec, GrooveSpec};
use crate::curve::ControlCurve;
use crate::math::smoothstep;
use crate::surface::SurfaceFrame;
use crate::types::{MeshBuffers, MeshLayout};

/// Fraction of a groove's length over which it ramps in and out
const LENGTH_RAMP: f32 = 0.15;

/// Ring reach of the triangular smoothing kernel
const SMOOTHING_RADIUS: usize = 2;

/// Cap on accumulated depth for a slim blade
const MAX_DEPTH_FRACTION: f32 = 0.85;

/// Everything groove carving reads besides the specs
pub struct GrooveInput<'a> {
    pub layout: &'a MeshLayout,
    pub frame: &'a SurfaceFrame,
    /// Configured full thickness
    pub thickness: f32,
    /// Widest ring of the blade
    pub blade_width: f32,
}

/// Deepest accumulated groove depth, as a fraction of half-thickness
///
/// Wide blades relative to their thickness get a lower cap so overlapping
/// grooves cannot punch through.
pub fn max_allowed_depth(thickness: f32, blade_width: f32) -> f32 {
    if blade_width <= f32::EPSILON || !thickness.is_finite() {
        return MAX_DEPTH_FRACTION;
    }
    MAX_DEPTH_FRACTION * (8.0 * thickness / blade_width).clamp(0.5, 1.0)
}

fn length_mask(spec: &GrooveSpec, height: f32) -> f32 {
    if height < spec.start || height > spec.end {
        return 0.0;
    }
    let ramp = (spec.end - spec.start) * LENGTH_RAMP;
    smoothstep(0.0, ramp, height - spec.start) * smoothstep(0.0, ramp, spec.end - height)
}

fn lateral_falloff(spec: &GrooveSpec, lateral: f32) -> f32 {
    let distance = (lateral - spec.center).abs() / spec.width;
    if distance > 1.0 {
        return 0.0;
    }
    spec.falloff.sample(distance).max(0.0)
}

/// Smoothed depth per front grid vertex, ring-major
///
/// Rings outside every groove's length range stay at zero.
pub fn groove_depth_map(
    grooves: &[&GrooveSpec],
    heights: &[f32],
    width_samples: usize,
    max_allowed: f32,
) -> Vec<f32> {
    let rings = heights.len();
    let lateral_span = width_samples.saturating_sub(1).max(1) as f32;
    let mut raw = vec![0.0f32; rings * width_samples];
    let mut support = vec![false; rings];

    for (ring, &height) in heights.iter().enumerate() {
        support[ring] = grooves
            .iter()
            .any(|g| height >= g.start && height <= g.end);
        if !support[ring] {
            continue;
        }
        for lateral in 0..width_samples {
            let u = lateral as f32 / lateral_span;
            let sum: f32 = grooves
                .iter()
                .map(|g| g.depth * length_mask(g, height) * lateral_falloff(g, u))
                .sum();
            raw[ring * width_samples + lateral] = sum.min(max_allowed);
        }
    }

    let mut smoothed = vec![0.0f32; raw.len()];
    for ring in (0..rings).filter(|&r| support[r]) {
        let lo = ring.saturating_sub(SMOOTHING_RADIUS);
        let hi = (ring + SMOOTHING_RADIUS).min(rings - 1);
        for lateral in 0..width_samples {
            let mut total = 0.0;
            let mut weights = 0.0;
            for other in lo..=hi {
                let weight = (SMOOTHING_RADIUS + 1 - ring.abs_diff(other)) as f32;
                total += raw[other * width_samples + lateral] * weight;
                weights += weight;
            }
            smoothed[ring * width_samples + lateral] = total / weights;
        }
    }

    smoothed
}

/// Displace the surfaces by every active groove in `carves`
///
/// Returns the deepest applied depth fraction (0 without grooves).
pub fn carve_grooves(carves: &[CarveSpec], input: &GrooveInput, buffers: &mut MeshBuffers) -> f32 {
    let grooves: Vec<&GrooveSpec> = carves
        .iter()
        .filter_map(|spec| match spec {
            CarveSpec::Groove(groove) if groove.is_active() => Some(groove),
            _ => None,
        })
        .collect();
    if grooves.is_empty() {
        return 0.0;
    }

    let layout = input.layout;
    let max_allowed = max_allowed_depth(input.thickness, input.blade_width);
    let depths = groove_depth_map(
        &grooves,
        &input.frame.ring_heights,
        layout.width_samples,
        max_allowed,
    );

    let mut deepest = 0.0f32;
    for ring in 0..layout.ring_count {
        let normal = input.frame.ring_normals[ring];
        for lateral in 0..layout.width_samples {
            let front = layout.front(ring, lateral);
            let depth = depths[ring * layout.width_samples + lateral];
            if depth <= 0.0 {
                continue;
            }
            deepest = deepest.max(depth);
            let offset = normal * (depth * input.frame.half_thickness[front]);
            buffers.vertices[front] -= offset;
            buffers.vertices[layout.back(front)] += offset;
        }
    }

    debug!(grooves = grooves.len(), max_allowed, deepest, "carved grooves");
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(count: usize) -> Vec<f32> {
        (0..count).map(|i| i as f32 / (count - 1) as f32).collect()
    }

    #[test]
    fn test_max_allowed_depth_scales_with_width() {
        assert!((max_allowed_depth(0.04, 0.2) - 0.85).abs() < 1e-6);
        assert!((max_allowed_depth(0.04, 1.0) - 0.425).abs() < 1e-6);
        assert_eq!(max_allowed_depth(0.04, 0.0), 0.85);
    }

    #[test]
    fn test_overlapping_grooves_are_capped() {
        let spec = GrooveSpec {
            start: 0.0,
            end: 1.0,
            depth: 0.6,
            ..Default::default()
        };
        let grooves = [&spec, &spec, &spec];
        let map = groove_depth_map(&grooves, &heights(21), 9, 0.5);
        assert!(map.iter().all(|&d| d <= 0.5 + 1e-6));
        assert!(map.iter().any(|&d| d > 0.45));
    }

    #[test]
    fn test_depth_zero_outside_length_range() {
        let spec = GrooveSpec::default();
        let h = heights(21);
        let map = groove_depth_map(&[&spec], &h, 9, 0.85);
        for (ring, height) in h.iter().enumerate() {
            let row = &map[ring * 9..ring * 9 + 9];
            if *height < spec.start || *height > spec.end {
                assert!(row.iter().all(|&d| d == 0.0), "ring {ring} displaced");
            }
        }
    }

    #[test]
    fn test_peak_at_lateral_center() {
        let spec = GrooveSpec::default();
        let h = heights(21);
        let map = groove_depth_map(&[&spec], &h, 9, 0.85);
        let ring = 9;
        let row = &map[ring * 9..ring * 9 + 9];
        let peak = row
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(4));
        assert_eq!(row[0], 0.0);
    }
}
