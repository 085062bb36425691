//! Texture coordinates
//!
//! V runs along the blade by normalised center arc length, U across it by
//! lateral ratio. The back face and the back ridges are mirrored in U so a
//! texture reads the same way from both sides. Hole walls are not touched
//! here; they interpolate from the surface when they are built.

use glam::Vec2;

use crate::types::{MeshBuffers, MeshLayout, MeshPass};

/// Assigns UVs to the surface and ridge blocks of a layout
pub struct UvMapper<'a> {
    pub layout: &'a MeshLayout,
    /// Arc length ratio of each ring
    pub heights: &'a [f32],
}

impl UvMapper<'_> {
    fn height(&self, ring: usize) -> f32 {
        self.heights.get(ring).copied().unwrap_or(0.0)
    }
}

impl MeshPass for UvMapper<'_> {
    fn apply(&self, buffers: &mut MeshBuffers) {
        let layout = self.layout;
        if buffers.uvs.len() < layout.wall_start {
            return;
        }
        let lateral_span = (layout.width_samples.max(2) - 1) as f32;

        for ring in 0..layout.ring_count {
            let v = self.height(ring);
            for lateral in 0..layout.width_samples {
                let u = lateral as f32 / lateral_span;
                let front = layout.front(ring, lateral);
                buffers.uvs[front] = Vec2::new(u, v);
                buffers.uvs[layout.back(front)] = Vec2::new(1.0 - u, v);
            }

            for right in [false, true] {
                let u = if right { 1.0 } else { 0.0 };
                buffers.uvs[layout.ridge(true, ring, right)] = Vec2::new(u, v);
                buffers.uvs[layout.ridge(false, ring, right)] = Vec2::new(1.0 - u, v);
            }
        }

        let tip = Vec2::new(0.5, 1.0);
        buffers.uvs[layout.tip()] = tip;
        buffers.uvs[layout.back(layout.tip())] = tip;
    }
}
