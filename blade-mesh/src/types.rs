//! Blade mesh types
//!
//! Input skeleton segments and the block-structured output buffers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// One coarse cross-section anchor of the skeleton
///
/// Segments are ordered from the base (first) to the tip (last). `left` and
/// `right` are the blade extents at this cross-section; they do not have to
/// be symmetric around `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub center: Vec3,
    pub left: Vec3,
    pub right: Vec3,
}

impl Segment {
    pub fn new(center: Vec3, left: Vec3, right: Vec3) -> Self {
        Self {
            center,
            left,
            right,
        }
    }

    /// Segment whose extents sit `half_width` either side of `center` along `lateral`
    pub fn symmetric(center: Vec3, lateral: Vec3, half_width: f32) -> Self {
        let offset = lateral.normalize_or_zero() * half_width;
        Self::new(center, center - offset, center + offset)
    }

    /// Distance between the left and right extents
    pub fn width(&self) -> f32 {
        self.left.distance(self.right)
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.left.is_finite() && self.right.is_finite()
    }
}

/// Output buffers, parallel per vertex, plus two submesh index lists
///
/// Vertex layout (see [`MeshLayout`]):
/// - `[0, front)` front surface (ring-major, then the tip vertex)
/// - `[front, 2*front)` back surface, vertex `i + front` mirrors front vertex `i`
/// - bevel front ridge block, 2 vertices per ring (left, right)
/// - bevel back ridge block, same shape
/// - hole wall vertices appended by carving
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Submesh 0
    pub triangles_body: Vec<u32>,
    /// Submesh 1, the sharpened edge
    pub triangles_edge: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangle count across both submeshes
    pub fn triangle_count(&self) -> usize {
        (self.triangles_body.len() + self.triangles_edge.len()) / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex with a placeholder normal, returning its index
    pub fn push_vertex(&mut self, position: Vec3, uv: Vec2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(Vec3::ZERO);
        self.uvs.push(uv);
        index
    }

    /// Iterate every triangle of both submeshes as index triples
    pub fn all_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles_body
            .chunks_exact(3)
            .chain(self.triangles_edge.chunks_exact(3))
            .map(|c| [c[0], c[1], c[2]])
    }
}

/// In-place pass over finished buffers
pub trait MeshPass {
    fn apply(&self, buffers: &mut MeshBuffers);
}

impl MeshBuffers {
    /// Run `pass` and return `&mut Self` for chaining
    pub fn apply<P: MeshPass>(&mut self, pass: P) -> &mut Self {
        pass.apply(self);
        self
    }
}

/// Submesh selector for generated triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submesh {
    Body,
    Edge,
}

/// Block offsets of the vertex layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshLayout {
    /// Number of resampled rings
    pub ring_count: usize,
    /// Lateral samples per ring
    pub width_samples: usize,
    /// Front vertices, including the tip
    pub front_count: usize,
    /// First vertex of the front ridge block
    pub bevel_front_start: usize,
    /// First vertex of the back ridge block
    pub bevel_back_start: usize,
    /// First appended hole wall vertex
    pub wall_start: usize,
}

impl MeshLayout {
    pub fn new(ring_count: usize, width_samples: usize) -> Self {
        let front_count = ring_count * width_samples + 1;
        let bevel_front_start = front_count * 2;
        let bevel_back_start = bevel_front_start + ring_count * 2;
        Self {
            ring_count,
            width_samples,
            front_count,
            bevel_front_start,
            bevel_back_start,
            wall_start: bevel_back_start + ring_count * 2,
        }
    }

    /// Front vertex index of lateral sample `lateral` on ring `ring`
    #[inline]
    pub fn front(&self, ring: usize, lateral: usize) -> usize {
        ring * self.width_samples + lateral
    }

    /// Back vertex index mirroring front vertex `front_index`
    #[inline]
    pub fn back(&self, front_index: usize) -> usize {
        front_index + self.front_count
    }

    /// Index of the single tip vertex on the front surface
    #[inline]
    pub fn tip(&self) -> usize {
        self.front_count - 1
    }

    /// Ridge vertex of `ring` on the left (`right = false`) or right side
    #[inline]
    pub fn ridge(&self, front_side: bool, ring: usize, right: bool) -> usize {
        let start = if front_side {
            self.bevel_front_start
        } else {
            self.bevel_back_start
        };
        start + ring * 2 + usize::from(right)
    }

    /// Maps a surface vertex (front or back) back to `(ring, lateral)`
    ///
    /// Returns `None` for the tip and for vertices outside the surface blocks.
    pub fn grid_coords(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.front_count * 2 {
            return None;
        }
        let local = index % self.front_count;
        if local == self.tip() {
            return None;
        }
        Some((local / self.width_samples, local % self.width_samples))
    }
}

/// Inclusive range of rings touched by a hole mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HollowRange {
    pub start_ring: usize,
    pub end_ring: usize,
}

/// What hole carving did to the mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleReport {
    /// Rings covered by band holes
    pub band: Option<HollowRange>,
    /// Rings covered by circular holes
    pub circular: Option<HollowRange>,
    /// Region boundary edges that needed a wall
    pub exposed_edges: usize,
    /// Wall ladders emitted, one per exposed edge
    pub wall_quads: usize,
    /// Surface triangles removed
    pub deleted_triangles: usize,
    /// Padding vertices moved onto a circular hole's boundary
    pub snapped_vertices: usize,
}

/// Statistics of one generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub ring_count: usize,
    /// Deepest groove after accumulation and smoothing, as a fraction of local half-thickness
    pub max_groove_depth: f32,
    pub holes: HoleReport,
}

/// Finished blade: buffers plus the layout that indexes them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BladeMesh {
    pub buffers: MeshBuffers,
    pub layout: MeshLayout,
    pub report: GenerationReport,
}

impl BladeMesh {
    /// Empty result for a skeleton that cannot be meshed
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Number of vertices appended by hole wall synthesis
    pub fn wall_vertex_count(&self) -> usize {
        self.buffers
            .vertex_count()
            .saturating_sub(self.layout.wall_start)
    }
}
