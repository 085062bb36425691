//! Hole carving
//!
//! Works on grid cells, the quads between two neighbouring rings and two
//! neighbouring lateral samples. A cell is removed from both faces when all
//! four of its corners sit inside the combined delete mask. Every edge where
//! a removed cell meets a kept one then gets a wall ladder from the front
//! face to the back face. Edges on the base ring or the lateral border have
//! no neighbour and stay open; the bevel is suppressed there instead, and
//! its faces on the neighbouring rings are stitched into the border walls.
//!
//! Padding snapping runs on its own, before the bevel, so collapsed ridges
//! land on the snapped edge vertices.

use glam::{Vec2, Vec3};
use tracing::debug;

use super::mask::HoleMasks;
use crate::bevel::WallChains;
use crate::types::{HoleReport, MeshBuffers, MeshLayout};

/// Everything hole carving reads besides the buffers
pub struct HoleCarveInput<'a> {
    pub layout: &'a MeshLayout,
    pub masks: &'a HoleMasks,
    /// Quads between the front and back edge of each wall
    pub wall_segments: u32,
}

/// Removed cells, indexed `[ring * (width_samples - 1) + lateral]`
struct CellGrid {
    rings: usize,
    columns: usize,
    deleted: Vec<bool>,
}

impl CellGrid {
    fn from_masks(layout: &MeshLayout, masks: &HoleMasks) -> Self {
        let rings = layout.ring_count.saturating_sub(1);
        let columns = layout.width_samples.saturating_sub(1);
        let mut deleted = vec![false; rings * columns];
        for ring in 0..rings {
            for lateral in 0..columns {
                deleted[ring * columns + lateral] = masks.deletes_cell(ring, lateral);
            }
        }
        Self {
            rings,
            columns,
            deleted,
        }
    }

    fn is_deleted(&self, ring: usize, lateral: usize) -> bool {
        ring < self.rings && lateral < self.columns && self.deleted[ring * self.columns + lateral]
    }

    fn count(&self) -> usize {
        self.deleted.iter().filter(|&&d| d).count()
    }
}

/// Boundary edge between a removed cell and a kept one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WallEdge {
    /// Grid corners `(ring, lateral)` of the shared edge
    from: (usize, usize),
    to: (usize, usize),
    /// The removed cell
    cell: (usize, usize),
}

fn exposed_edges(cells: &CellGrid) -> Vec<WallEdge> {
    let mut edges = Vec::new();
    for ring in 0..cells.rings {
        for lateral in 0..cells.columns {
            if !cells.is_deleted(ring, lateral) {
                continue;
            }
            let cell = (ring, lateral);

            // Base ring edge stays open
            if ring > 0 && !cells.is_deleted(ring - 1, lateral) {
                edges.push(WallEdge {
                    from: (ring, lateral),
                    to: (ring, lateral + 1),
                    cell,
                });
            }
            if !cells.is_deleted(ring + 1, lateral) {
                edges.push(WallEdge {
                    from: (ring + 1, lateral),
                    to: (ring + 1, lateral + 1),
                    cell,
                });
            }
            // Lateral border edges stay open
            if lateral > 0 && !cells.is_deleted(ring, lateral - 1) {
                edges.push(WallEdge {
                    from: (ring, lateral),
                    to: (ring + 1, lateral),
                    cell,
                });
            }
            if lateral + 1 < cells.columns && !cells.is_deleted(ring, lateral + 1) {
                edges.push(WallEdge {
                    from: (ring, lateral + 1),
                    to: (ring + 1, lateral + 1),
                    cell,
                });
            }
        }
    }
    edges
}

/// Move the circular mask's padding vertices onto its raw boundary
///
/// Front and back move together. Returns the number of moved pairs.
pub fn snap_padding(layout: &MeshLayout, masks: &HoleMasks, buffers: &mut MeshBuffers) -> usize {
    let mask = &masks.circular;
    let mut snapped = 0;
    for (ring, (raw, padded)) in mask.extents.iter().zip(&mask.delete_extents).enumerate() {
        let (Some((min, max)), Some((pad_min, pad_max))) = (raw, padded) else {
            continue;
        };
        let outward = (*pad_min..*min)
            .map(|lateral| (lateral, *min))
            .chain((*max + 1..=*pad_max).map(|lateral| (lateral, *max)));
        for (lateral, boundary) in outward {
            let target = layout.front(ring, boundary);
            let source = layout.front(ring, lateral);
            buffers.vertices[source] = buffers.vertices[target];
            buffers.vertices[layout.back(source)] = buffers.vertices[layout.back(target)];
            snapped += 1;
        }
    }
    if snapped > 0 {
        debug!(snapped, "snapped hole padding");
    }
    snapped
}

/// Grid cell a surface triangle belongs to, if any
fn cell_of(layout: &MeshLayout, triangle: &[u32]) -> Option<(usize, usize)> {
    let mut ring = usize::MAX;
    let mut lateral = usize::MAX;
    for &index in triangle {
        let (r, l) = layout.grid_coords(index as usize)?;
        ring = ring.min(r);
        lateral = lateral.min(l);
    }
    Some((ring, lateral))
}

fn delete_cells(layout: &MeshLayout, cells: &CellGrid, indices: &mut Vec<u32>) -> usize {
    let before = indices.len();
    let kept: Vec<u32> = indices
        .chunks_exact(3)
        .filter(|tri| {
            cell_of(layout, tri).is_none_or(|(ring, lateral)| !cells.is_deleted(ring, lateral))
        })
        .flatten()
        .copied()
        .collect();
    *indices = kept;
    (before - indices.len()) / 3
}

/// Append one wall ladder for `edge`, facing into the removed cell
///
/// Row `k` holds vertices `first + 2k` (on `edge.from`) and `first + 2k + 1`
/// (on `edge.to`), running from the front face to the back. Returns `first`.
fn build_wall(
    layout: &MeshLayout,
    edge: &WallEdge,
    segments: u32,
    buffers: &mut MeshBuffers,
) -> u32 {
    let fp = layout.front(edge.from.0, edge.from.1);
    let fq = layout.front(edge.to.0, edge.to.1);
    let (bp, bq) = (layout.back(fp), layout.back(fq));

    let (cell_ring, cell_lateral) = edge.cell;
    let corners = [
        layout.front(cell_ring, cell_lateral),
        layout.front(cell_ring, cell_lateral + 1),
        layout.front(cell_ring + 1, cell_lateral),
        layout.front(cell_ring + 1, cell_lateral + 1),
    ];
    let cell_center = corners
        .iter()
        .map(|&i| buffers.vertices[i] + buffers.vertices[layout.back(i)])
        .sum::<Vec3>()
        / 8.0;
    let edge_center =
        (buffers.vertices[fp] + buffers.vertices[fq] + buffers.vertices[bp] + buffers.vertices[bq])
            / 4.0;
    let into_hole = cell_center - edge_center;

    let segments = segments.max(1);
    let first = buffers.vertex_count() as u32;
    for row in 0..=segments {
        let t = row as f32 / segments as f32;
        for (front, back) in [(fp, bp), (fq, bq)] {
            let position = buffers.vertices[front].lerp(buffers.vertices[back], t);
            let uv: Vec2 = buffers.uvs[front].lerp(buffers.uvs[back], t);
            buffers.push_vertex(position, uv);
        }
    }

    let p0 = buffers.vertices[first as usize];
    let q0 = buffers.vertices[first as usize + 1];
    let p1 = buffers.vertices[first as usize + 2];
    let flip = (q0 - p0).cross(p1 - p0).dot(into_hole) < 0.0;

    for row in 0..segments {
        let p0 = first + row * 2;
        let q0 = p0 + 1;
        let p1 = p0 + 2;
        let q1 = p0 + 3;
        if flip {
            buffers.triangles_body.extend_from_slice(&[p0, p1, q0, q0, p1, q1]);
        } else {
            buffers.triangles_body.extend_from_slice(&[p0, q0, p1, q0, q1, p1]);
        }
    }
    first
}

/// One side of a wall ladder, front to back
fn ladder_side(first: u32, segments: u32, side: u32) -> Vec<u32> {
    (0..=segments).map(|row| first + row * 2 + side).collect()
}

/// Result of cutting the holes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarvedHoles {
    pub report: HoleReport,
    /// Cap walls standing on the lateral border, for the bevel to meet
    pub chains: WallChains,
}

/// Delete and wall every hole in `input.masks`
///
/// Expects UVs to be assigned already; walls interpolate them. Padding must
/// have been snapped with [`snap_padding`] beforehand.
pub fn carve_holes(input: &HoleCarveInput, buffers: &mut MeshBuffers) -> CarvedHoles {
    let masks = input.masks;
    let layout = input.layout;
    let mut carved = CarvedHoles {
        report: HoleReport {
            band: masks.band.range,
            circular: masks.circular.range,
            ..Default::default()
        },
        chains: WallChains::new(layout.ring_count),
    };
    if masks.is_empty() {
        return carved;
    }

    let cells = CellGrid::from_masks(layout, masks);
    let report = &mut carved.report;
    report.deleted_triangles = delete_cells(layout, &cells, &mut buffers.triangles_body)
        + delete_cells(layout, &cells, &mut buffers.triangles_edge);

    let edges = exposed_edges(&cells);
    report.exposed_edges = edges.len();
    let segments = input.wall_segments.max(1);
    let last_lateral = layout.width_samples - 1;
    for edge in &edges {
        let first = build_wall(layout, edge, segments, buffers);
        report.wall_quads += 1;

        // Caps reaching the border carry the seam with the bevel
        if edge.from.0 == edge.to.0 {
            if edge.from.1 == 0 {
                carved.chains.insert(edge.from.0, false, ladder_side(first, segments, 0));
            }
            if edge.to.1 == last_lateral {
                carved.chains.insert(edge.to.0, true, ladder_side(first, segments, 1));
            }
        }
    }

    debug!(
        cells = cells.count(),
        deleted = report.deleted_triangles,
        walls = report.wall_quads,
        "carved holes"
    );
    carved
}
