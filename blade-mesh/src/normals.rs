//! Vertex normal recalculation
//!
//! Area-weighted face normals accumulated per vertex across both submeshes.

use glam::Vec3;

use crate::types::{MeshBuffers, MeshPass};

/// Recomputes every vertex normal from the current triangles
///
/// Vertices referenced by no triangle (or only degenerate ones) fall back to
/// `fallback`.
#[derive(Debug, Clone, Copy)]
pub struct RecalculateNormals {
    pub fallback: Vec3,
}

impl Default for RecalculateNormals {
    fn default() -> Self {
        Self { fallback: Vec3::Z }
    }
}

impl MeshPass for RecalculateNormals {
    fn apply(&self, buffers: &mut MeshBuffers) {
        let mut accumulated = vec![Vec3::ZERO; buffers.vertices.len()];

        for [a, b, c] in buffers.all_triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let p0 = buffers.vertices[a];
            let p1 = buffers.vertices[b];
            let p2 = buffers.vertices[c];

            // Unnormalised cross product weights by triangle area
            let face = (p1 - p0).cross(p2 - p0);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        buffers.normals = accumulated
            .into_iter()
            .map(|n| n.normalize_or(self.fallback))
            .collect();
    }
}
