//! Front and back surface construction
//!
//! The front face is a ring-by-lateral grid closed by a fan into a single tip
//! vertex. The back face is derived from it: every front vertex is pushed out
//! along its ring normal by the blended profile half-thickness, and the back
//! vertex sits the full thickness behind it.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::profile::{CrossSectionLayer, blend_thickness_at_overlap};
use crate::sampler::SampledSkeleton;
use crate::types::{MeshBuffers, MeshLayout};

/// Thickness parameters for the back face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThicknessSettings {
    /// Full thickness at the spine
    pub thickness: f32,
    /// Blend zone of overlapping profile layers
    pub overlap_blend: f32,
    /// Rings over which thickness fades to zero at the tip
    pub tip_subdivisions: u32,
    /// Exponent of the tip fade
    pub tip_fade_power: f32,
}

/// Per-ring and per-vertex data later stages need
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceFrame {
    /// Outward normal of the front face, per ring
    pub ring_normals: Vec<Vec3>,
    /// Half-thickness applied to each front vertex (tip included)
    pub half_thickness: Vec<f32>,
    /// Height ratio (arc length) of each ring
    pub ring_heights: Vec<f32>,
}

/// Point at lateral ratio `u` on a ring
///
/// The left half of the samples spans left extent to spine and the right half
/// spans spine to right extent, so the middle sample rides the spine.
fn lateral_sample(left: Vec3, spine: Vec3, right: Vec3, u: f32) -> Vec3 {
    if u < 0.5 {
        left.lerp(spine, u * 2.0)
    } else {
        spine.lerp(right, (u - 0.5) * 2.0)
    }
}

/// Emit front vertices and front triangles into empty `buffers`
///
/// Returns the layout describing where every block lives.
pub fn build_front(
    skeleton: &SampledSkeleton,
    width_samples: usize,
    buffers: &mut MeshBuffers,
) -> MeshLayout {
    let rings = skeleton.ring_count();
    let width_samples = width_samples.max(2);
    let layout = MeshLayout::new(rings, width_samples);

    buffers.vertices.reserve(layout.wall_start);
    buffers.normals.reserve(layout.wall_start);
    buffers.uvs.reserve(layout.wall_start);

    for ring in 0..rings {
        let left = skeleton.lefts[ring];
        let right = skeleton.rights[ring];
        let spine = left.lerp(right, skeleton.spine_ratios[ring]);
        for lateral in 0..width_samples {
            let u = lateral as f32 / (width_samples - 1) as f32;
            buffers.push_vertex(lateral_sample(left, spine, right, u), Vec2::ZERO);
        }
    }
    let tip = skeleton.geometric_centers[rings - 1];
    buffers.push_vertex(tip, Vec2::ZERO);

    for ring in 0..rings - 1 {
        for lateral in 0..width_samples - 1 {
            let a = layout.front(ring, lateral) as u32;
            let b = a + 1;
            let c = layout.front(ring + 1, lateral) as u32;
            let d = c + 1;
            buffers.triangles_body.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    let tip_index = layout.tip() as u32;
    for lateral in 0..width_samples - 1 {
        let a = layout.front(rings - 1, lateral) as u32;
        buffers.triangles_body.extend_from_slice(&[a, a + 1, tip_index]);
    }

    layout
}

/// Ring normals from lateral and forward directions
///
/// Collapsed rings borrow the lateral direction of the previous ring.
pub fn ring_normals(skeleton: &SampledSkeleton) -> Vec<Vec3> {
    let rings = skeleton.ring_count();
    let mut normals = Vec::with_capacity(rings);
    let mut lateral = Vec3::X;
    let mut previous_normal = Vec3::Z;

    for ring in 0..rings {
        let width = skeleton.rights[ring] - skeleton.lefts[ring];
        if width.length_squared() > 1e-12 {
            lateral = width.normalize();
        }

        let forward = if ring + 1 < rings {
            skeleton.centers[ring + 1] - skeleton.centers[ring]
        } else if ring > 0 {
            skeleton.centers[ring] - skeleton.centers[ring - 1]
        } else {
            Vec3::Y
        };

        let normal = lateral.cross(forward).normalize_or_zero();
        let normal = if normal == Vec3::ZERO {
            previous_normal
        } else {
            normal
        };
        normals.push(normal);
        previous_normal = normal;
    }

    normals
}

/// Signed lateral ratio of `point`, -1 at the left extent, +1 at the right
///
/// Measured from the geometric center so the spine offset does not skew the
/// profile.
fn lateral_ratio(point: Vec3, left: Vec3, right: Vec3, geometric_center: Vec3) -> f32 {
    let axis = (right - left).normalize_or_zero();
    if axis == Vec3::ZERO {
        return 0.0;
    }
    let offset = (point - geometric_center).dot(axis);
    let reach = if offset < 0.0 {
        (geometric_center - left).dot(axis)
    } else {
        (right - geometric_center).dot(axis)
    };
    if reach <= f32::EPSILON {
        return offset.signum();
    }
    (offset / reach).clamp(-1.0, 1.0)
}

/// Thickness multiplier approaching zero over the last `tip_subdivisions` rings
fn tip_fade(ring: usize, rings: usize, tip_subdivisions: u32, power: f32) -> f32 {
    let from_tip = (rings - 1 - ring) as f32;
    let span = tip_subdivisions.max(1) as f32;
    (from_tip / span).min(1.0).powf(power.max(f32::EPSILON))
}

/// Push the front face out and append the mirrored back face
pub fn build_back(
    skeleton: &SampledSkeleton,
    layout: &MeshLayout,
    layers: &[CrossSectionLayer],
    settings: &ThicknessSettings,
    buffers: &mut MeshBuffers,
) -> SurfaceFrame {
    let rings = layout.ring_count;
    let width_samples = layout.width_samples;
    let normals = ring_normals(skeleton);
    let heights = skeleton.arc_length_ratios();
    let nominal_half = settings.thickness.max(0.0) * 0.5;

    let mut half_thickness = vec![0.0; layout.front_count];
    for ring in 0..rings {
        let fade = tip_fade(ring, rings, settings.tip_subdivisions, settings.tip_fade_power);
        for lateral in 0..width_samples {
            let index = layout.front(ring, lateral);
            let t = lateral_ratio(
                buffers.vertices[index],
                skeleton.lefts[ring],
                skeleton.rights[ring],
                skeleton.geometric_centers[ring],
            );
            let half = blend_thickness_at_overlap(
                layers,
                heights[ring],
                t,
                nominal_half,
                settings.overlap_blend,
            );
            half_thickness[index] = half.max(0.0) * fade;
        }
    }

    // Front vertices move out, back vertices sit a full thickness behind
    for index in 0..layout.front_count {
        let normal = match layout.grid_coords(index) {
            Some((ring, _)) => normals[ring],
            None => normals[rings - 1],
        };
        let half = half_thickness[index];
        buffers.vertices[index] += normal * half;
    }
    for index in 0..layout.front_count {
        let normal = match layout.grid_coords(index) {
            Some((ring, _)) => normals[ring],
            None => normals[rings - 1],
        };
        let back = buffers.vertices[index] - normal * (2.0 * half_thickness[index]);
        buffers.push_vertex(back, Vec2::ZERO);
    }

    // Mirror the front index pattern with reversed winding
    let offset = layout.front_count as u32;
    let front_triangles = buffers.triangles_body.len();
    for i in (0..front_triangles).step_by(3) {
        let a = buffers.triangles_body[i] + offset;
        let b = buffers.triangles_body[i + 1] + offset;
        let c = buffers.triangles_body[i + 2] + offset;
        buffers.triangles_body.extend_from_slice(&[a, c, b]);
    }

    debug!(
        rings,
        width_samples,
        front_vertices = layout.front_count,
        "built surface"
    );

    SurfaceFrame {
        ring_normals: normals,
        half_thickness,
        ring_heights: heights,
    }
}
