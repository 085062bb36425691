//! Edge bevel ridges
//!
//! Each ring gets four ridge vertices: a left and right ridge offset toward
//! the front normal, and the same pair offset toward the back. Strips of six
//! triangles per ring pair join the front edge, both ridges and the back edge.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::config::SharpSide;
use crate::sampler::SampledSkeleton;
use crate::surface::SurfaceFrame;
use crate::types::{MeshBuffers, MeshLayout, Submesh};

/// Ridge parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelSettings {
    /// Lateral ridge offset on a sharpened side
    pub edge_sharpness: f32,
    /// Lateral ridge offset on an unsharpened side
    pub spine_thickness: f32,
    /// Fraction of the edge half-thickness the ridge keeps
    pub bevel_smoothness: f32,
    pub sharp_side: SharpSide,
}

impl BevelSettings {
    fn ridge_distance(&self, right: bool) -> f32 {
        let distance = if self.sharp_side.is_sharp(right) {
            self.edge_sharpness
        } else {
            self.spine_thickness
        };
        distance.max(0.0)
    }
}

/// Outermost grid cells removed by holes, per ring pair and side
///
/// Entry `r` covers the cell between rings `r` and `r + 1`. A ring is hit on
/// a side when a removed cell touches it there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeHits {
    pub left_cuts: Vec<bool>,
    pub right_cuts: Vec<bool>,
}

impl EdgeHits {
    /// No cell cut
    pub fn none(ring_count: usize) -> Self {
        let pairs = ring_count.saturating_sub(1);
        Self {
            left_cuts: vec![false; pairs],
            right_cuts: vec![false; pairs],
        }
    }

    /// Whether the outermost cell between `pair` and `pair + 1` is removed
    pub fn is_cut(&self, pair: usize, right: bool) -> bool {
        let side = if right { &self.right_cuts } else { &self.left_cuts };
        side.get(pair).copied().unwrap_or(false)
    }

    pub fn is_hit(&self, ring: usize, right: bool) -> bool {
        (ring > 0 && self.is_cut(ring - 1, right)) || self.is_cut(ring, right)
    }

    pub fn any(&self) -> bool {
        self.left_cuts.iter().chain(&self.right_cuts).any(|&cut| cut)
    }
}

/// Hole wall vertices standing on a ring's border vertex, front to back
///
/// A wall splits the front-to-back span into several rows, so the bevel face
/// meeting it is stitched into those rows instead of a single edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallChains {
    left: Vec<Option<Vec<u32>>>,
    right: Vec<Option<Vec<u32>>>,
}

impl WallChains {
    pub fn new(ring_count: usize) -> Self {
        Self {
            left: vec![None; ring_count],
            right: vec![None; ring_count],
        }
    }

    pub fn insert(&mut self, ring: usize, right: bool, chain: Vec<u32>) {
        let side = if right { &mut self.right } else { &mut self.left };
        if let Some(slot) = side.get_mut(ring) {
            *slot = Some(chain);
        }
    }

    pub fn get(&self, ring: usize, right: bool) -> Option<&[u32]> {
        let side = if right { &self.right } else { &self.left };
        side.get(ring).and_then(|chain| chain.as_deref())
    }
}

/// Unit vector from left to right across every ring
///
/// Collapsed rings reuse the previous direction. A collapsed first or final
/// ring instead takes `forward × normal`, with forward pointing along the
/// skeleton toward the tip.
pub fn lateral_directions(
    skeleton: &SampledSkeleton,
    layout: &MeshLayout,
    frame: &SurfaceFrame,
    buffers: &MeshBuffers,
) -> Vec<Vec3> {
    let rings = layout.ring_count;
    let last_lateral = layout.width_samples - 1;
    let mut directions = Vec::with_capacity(rings);
    let mut previous: Option<Vec3> = None;

    for ring in 0..rings {
        let left = mid_plane(layout, buffers, layout.front(ring, 0));
        let right = mid_plane(layout, buffers, layout.front(ring, last_lateral));
        let across = right - left;

        let direction = if across.length_squared() > 1e-12 {
            across.normalize()
        } else if ring == 0 || ring + 1 == rings {
            let forward = if ring + 1 < rings {
                skeleton.centers[ring + 1] - skeleton.centers[ring]
            } else if ring > 0 {
                skeleton.centers[ring] - skeleton.centers[ring - 1]
            } else {
                Vec3::Y
            };
            forward
                .cross(frame.ring_normals[ring])
                .normalize_or(previous.unwrap_or(Vec3::X))
        } else {
            previous.unwrap_or(Vec3::X)
        };
        directions.push(direction);
        previous = Some(direction);
    }

    directions
}

fn mid_plane(layout: &MeshLayout, buffers: &MeshBuffers, front_index: usize) -> Vec3 {
    (buffers.vertices[front_index] + buffers.vertices[layout.back(front_index)]) * 0.5
}

/// Append one ridge block, two vertices per ring
///
/// `front_side` picks the sign of the normal offset. Call with `true` first so
/// the blocks land where [`MeshLayout::ridge`] expects them.
pub fn build_ridges(
    layout: &MeshLayout,
    frame: &SurfaceFrame,
    lateral: &[Vec3],
    hits: &EdgeHits,
    settings: &BevelSettings,
    front_side: bool,
    buffers: &mut MeshBuffers,
) {
    debug_assert_eq!(
        buffers.vertex_count(),
        if front_side {
            layout.bevel_front_start
        } else {
            layout.bevel_back_start
        }
    );

    let sign = if front_side { 1.0 } else { -1.0 };
    let smoothness = settings.bevel_smoothness.clamp(0.0, 1.0);

    for ring in 0..layout.ring_count {
        let normal = frame.ring_normals[ring];
        for right in [false, true] {
            let lateral_index = if right { layout.width_samples - 1 } else { 0 };
            let front = layout.front(ring, lateral_index);
            let front_pos = buffers.vertices[front];
            let back_pos = buffers.vertices[layout.back(front)];

            let position = if hits.is_hit(ring, right) {
                if front_side { front_pos } else { back_pos }
            } else {
                let outward = if right { lateral[ring] } else { -lateral[ring] };
                let edge_half = front_pos.distance(back_pos) * 0.5;
                (front_pos + back_pos) * 0.5
                    + outward * settings.ridge_distance(right)
                    + normal * (sign * edge_half * smoothness)
            };
            buffers.push_vertex(position, Vec2::ZERO);
        }
    }
}

/// Front-to-back run the middle bevel face spans on one ring
fn ridge_run(
    layout: &MeshLayout,
    hits: &EdgeHits,
    chains: &WallChains,
    ring: usize,
    right: bool,
) -> Vec<u32> {
    match chains.get(ring, right) {
        Some(chain) if hits.is_hit(ring, right) && chain.len() >= 2 => chain.to_vec(),
        _ => vec![
            layout.ridge(true, ring, right) as u32,
            layout.ridge(false, ring, right) as u32,
        ],
    }
}

/// Triangulate the band between two front-to-back runs
///
/// Walks both runs together, always advancing the one lagging behind in
/// relative position. Two-vertex runs give the plain quad.
fn stitch_runs(lower: &[u32], upper: &[u32], right: bool, target: &mut Vec<u32>) {
    let lower_span = lower.len().saturating_sub(1).max(1) as f32;
    let upper_span = upper.len().saturating_sub(1).max(1) as f32;
    let (mut i, mut j) = (0, 0);

    while i + 1 < lower.len() || j + 1 < upper.len() {
        let advance_lower = j + 1 >= upper.len()
            || (i + 1 < lower.len()
                && (i + 1) as f32 / lower_span <= (j + 1) as f32 / upper_span);
        let [a, b, c] = if advance_lower {
            i += 1;
            [lower[i - 1], lower[i], upper[j]]
        } else {
            j += 1;
            [lower[i], upper[j], upper[j - 1]]
        };
        if right {
            target.extend_from_slice(&[a, b, c]);
        } else {
            target.extend_from_slice(&[a, c, b]);
        }
    }
}

/// Two triangles joining `a0 → a1` to `b0 → b1`, wound outward on `right`
fn push_quad(target: &mut Vec<u32>, right: bool, corners: [usize; 4]) {
    let [a0, a1, b0, b1] = corners.map(|i| i as u32);
    if right {
        target.extend_from_slice(&[a0, b0, a1, b0, b1, a1]);
    } else {
        target.extend_from_slice(&[a0, a1, b0, b0, a1, b1]);
    }
}

/// Stitch the ridges to the surface edges
///
/// A ring pair is skipped when its outermost cell on that side was removed.
/// Where a hit ring meets a hole wall, the middle face is stitched into the
/// wall's rows from `chains`. Returns the number of stitched ring pairs.
pub fn connect_bevels(
    layout: &MeshLayout,
    hits: &EdgeHits,
    chains: &WallChains,
    sharp_side: SharpSide,
    buffers: &mut MeshBuffers,
) -> usize {
    let mut stitched = 0;

    for right in [false, true] {
        let submesh = if sharp_side.is_sharp(right) {
            Submesh::Edge
        } else {
            Submesh::Body
        };
        let lateral_index = if right { layout.width_samples - 1 } else { 0 };

        for ring in 0..layout.ring_count.saturating_sub(1) {
            if hits.is_cut(ring, right) {
                continue;
            }

            let f0 = layout.front(ring, lateral_index);
            let f1 = layout.front(ring + 1, lateral_index);
            let lower = ridge_run(layout, hits, chains, ring, right);
            let upper = ridge_run(layout, hits, chains, ring + 1, right);

            let target = match submesh {
                Submesh::Body => &mut buffers.triangles_body,
                Submesh::Edge => &mut buffers.triangles_edge,
            };
            push_quad(
                target,
                right,
                [f0, f1, layout.ridge(true, ring, right), layout.ridge(true, ring + 1, right)],
            );
            stitch_runs(&lower, &upper, right, target);
            push_quad(
                target,
                right,
                [
                    layout.ridge(false, ring, right),
                    layout.ridge(false, ring + 1, right),
                    layout.back(f0),
                    layout.back(f1),
                ],
            );
            stitched += 1;
        }
    }

    debug!(stitched, "connected bevels");
    stitched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{SamplerSettings, sample_skeleton};
    use crate::surface::{ThicknessSettings, build_back, build_front};
    use crate::types::Segment;

    struct Fixture {
        layout: MeshLayout,
        frame: SurfaceFrame,
        lateral: Vec<Vec3>,
        buffers: MeshBuffers,
    }

    fn fixture() -> Fixture {
        let segments: Vec<Segment> = (0..3)
            .map(|i| {
                let half = if i == 2 { 0.0 } else { 0.5 };
                Segment::symmetric(Vec3::new(0.0, i as f32, 0.0), Vec3::X, half)
            })
            .collect();
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &|_: f32| 1.0);
        let mut buffers = MeshBuffers::new();
        let layout = build_front(&skeleton, 5, &mut buffers);
        let thickness = ThicknessSettings {
            thickness: 0.1,
            overlap_blend: 0.1,
            tip_subdivisions: 6,
            tip_fade_power: 0.6,
        };
        let frame = build_back(&skeleton, &layout, &[], &thickness, &mut buffers);
        let lateral = lateral_directions(&skeleton, &layout, &frame, &buffers);
        Fixture {
            layout,
            frame,
            lateral,
            buffers,
        }
    }

    fn settings(sharp_side: SharpSide) -> BevelSettings {
        BevelSettings {
            edge_sharpness: 0.02,
            spine_thickness: 0.005,
            bevel_smoothness: 0.1,
            sharp_side,
        }
    }

    fn build_both(f: &mut Fixture, hits: &EdgeHits, settings: &BevelSettings) {
        for front_side in [true, false] {
            build_ridges(
                &f.layout,
                &f.frame,
                &f.lateral,
                hits,
                settings,
                front_side,
                &mut f.buffers,
            );
        }
    }

    #[test]
    fn test_ridge_blocks_fill_layout() {
        let mut f = fixture();
        let hits = EdgeHits::none(f.layout.ring_count);
        build_both(&mut f, &hits, &settings(SharpSide::Both));
        assert_eq!(f.buffers.vertex_count(), f.layout.wall_start);
    }

    #[test]
    fn test_ridge_distance_follows_sharp_side() {
        let mut f = fixture();
        let hits = EdgeHits::none(f.layout.ring_count);
        build_both(&mut f, &hits, &settings(SharpSide::Right));

        let right_edge = f.buffers.vertices[f.layout.front(0, 4)];
        let right_ridge = f.buffers.vertices[f.layout.ridge(true, 0, true)];
        let left_edge = f.buffers.vertices[f.layout.front(0, 0)];
        let left_ridge = f.buffers.vertices[f.layout.ridge(true, 0, false)];

        assert!((right_ridge.x - right_edge.x - 0.02).abs() < 1e-5);
        assert!((left_edge.x - left_ridge.x - 0.005).abs() < 1e-5);
        // Front ridge sits on the front side of the mid-plane
        assert!(right_ridge.z > 0.0);
    }

    #[test]
    fn test_hit_ring_collapses_onto_surface() {
        let mut f = fixture();
        let mut hits = EdgeHits::none(f.layout.ring_count);
        hits.left_cuts[2] = true;
        build_both(&mut f, &hits, &settings(SharpSide::Both));
        assert!(hits.is_hit(3, false));
        assert!(!hits.is_hit(4, false));

        let front = f.layout.front(2, 0);
        assert_eq!(
            f.buffers.vertices[f.layout.ridge(true, 2, false)],
            f.buffers.vertices[front]
        );
        assert_eq!(
            f.buffers.vertices[f.layout.ridge(false, 2, false)],
            f.buffers.vertices[f.layout.back(front)]
        );
    }

    #[test]
    fn test_connect_routes_by_side() {
        let mut f = fixture();
        let hits = EdgeHits::none(f.layout.ring_count);
        build_both(&mut f, &hits, &settings(SharpSide::Left));
        let body_before = f.buffers.triangles_body.len();

        let pairs = f.layout.ring_count - 1;
        let chains = WallChains::new(f.layout.ring_count);
        let stitched = connect_bevels(&f.layout, &hits, &chains, SharpSide::Left, &mut f.buffers);

        assert_eq!(stitched, pairs * 2);
        assert_eq!(f.buffers.triangles_edge.len(), pairs * 6 * 3);
        assert_eq!(f.buffers.triangles_body.len() - body_before, pairs * 6 * 3);
    }

    #[test]
    fn test_connect_skips_cut_pairs() {
        let mut f = fixture();
        let mut hits = EdgeHits::none(f.layout.ring_count);
        hits.right_cuts[3] = true;
        build_both(&mut f, &hits, &settings(SharpSide::Both));

        let pairs = f.layout.ring_count - 1;
        let chains = WallChains::new(f.layout.ring_count);
        let stitched = connect_bevels(&f.layout, &hits, &chains, SharpSide::Both, &mut f.buffers);
        // Rings 3 and 4 are both hit, yet their neighbours still get a bevel
        assert_eq!(stitched, pairs * 2 - 1);
    }

    #[test]
    fn test_connect_stitches_into_wall_rows() {
        let mut f = fixture();
        let mut hits = EdgeHits::none(f.layout.ring_count);
        hits.right_cuts[3] = true;
        build_both(&mut f, &hits, &settings(SharpSide::Both));

        // Three-row wall standing on the right border of ring 3
        let front = f.layout.front(3, 4);
        let (p, q) = (f.buffers.vertices[front], f.buffers.vertices[f.layout.back(front)]);
        let chain: Vec<u32> = (0..=3)
            .map(|row| f.buffers.push_vertex(p.lerp(q, row as f32 / 3.0), Vec2::ZERO))
            .collect();
        let mut chains = WallChains::new(f.layout.ring_count);
        chains.insert(3, true, chain.clone());

        let pairs = f.layout.ring_count - 1;
        connect_bevels(&f.layout, &hits, &chains, SharpSide::Both, &mut f.buffers);

        // One skipped pair, and pair (2, 3) gains two triangles from the rows
        let triangles = f.buffers.triangles_edge.len() / 3;
        assert_eq!(triangles, (pairs * 2 - 1) * 6 + 2);
        for index in &chain {
            assert!(f.buffers.triangles_edge.contains(index));
        }
    }

    #[test]
    fn test_tip_direction_uses_forward_cross_normal() {
        let f = fixture();
        let last = f.layout.ring_count - 1;
        // Fixture tip collapses onto the center; forward is +Y and the normal +Z
        assert!(f.lateral[last].distance(Vec3::X) < 1e-4);
    }

    #[test]
    fn test_right_bevel_faces_outward() {
        let mut f = fixture();
        let hits = EdgeHits::none(f.layout.ring_count);
        build_both(&mut f, &hits, &settings(SharpSide::Both));
        let chains = WallChains::new(f.layout.ring_count);
        connect_bevels(&f.layout, &hits, &chains, SharpSide::Both, &mut f.buffers);

        let right_start = (f.layout.ring_count - 1) * 6 * 3;
        let tri = &f.buffers.triangles_edge[right_start..right_start + 3];
        let [p0, p1, p2] = [0, 1, 2].map(|k| f.buffers.vertices[tri[k] as usize]);
        assert!((p1 - p0).cross(p2 - p0).x > 0.0);
    }
}
