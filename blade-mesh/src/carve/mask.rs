//! Hole masks over the (ring, lateral sample) grid

use tracing::debug;

use super::CarveSpec;
use crate::bevel::EdgeHits;
use crate::types::HollowRange;

/// Lateral samples the circular delete mask reaches past the raw footprint
pub const CIRCULAR_DELETE_PADDING: usize = 2;

/// Per-ring footprint of one hole variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleMask {
    /// Inclusive `(min, max)` lateral extent of the raw footprint per ring
    pub extents: Vec<Option<(usize, usize)>>,
    /// Extents whose cells may be deleted, raw or padded
    pub delete_extents: Vec<Option<(usize, usize)>>,
    /// First and last ring with any footprint
    pub range: Option<HollowRange>,
}

impl HoleMask {
    fn from_rows(rows: &[Vec<bool>], width_samples: usize, padding: usize) -> Self {
        let mut extents = Vec::with_capacity(rows.len());
        let mut delete_extents = Vec::with_capacity(rows.len());
        let mut range: Option<HollowRange> = None;

        for (ring, row) in rows.iter().enumerate() {
            let min = row.iter().position(|&bit| bit);
            let max = row.iter().rposition(|&bit| bit);
            let extent = match (min, max) {
                (Some(min), Some(max)) => {
                    debug_assert!(max >= min, "hole extent inverted on ring {ring}");
                    range = Some(match range {
                        Some(r) => HollowRange {
                            start_ring: r.start_ring,
                            end_ring: ring,
                        },
                        None => HollowRange {
                            start_ring: ring,
                            end_ring: ring,
                        },
                    });
                    Some((min, max))
                }
                _ => None,
            };
            extents.push(extent);
            delete_extents.push(extent.map(|(min, max)| {
                (
                    min.saturating_sub(padding),
                    (max + padding).min(width_samples.saturating_sub(1)),
                )
            }));
        }

        Self {
            extents,
            delete_extents,
            range,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Whether `(ring, lateral)` lies inside the raw footprint
    pub fn contains(&self, ring: usize, lateral: usize) -> bool {
        within(self.extents.get(ring).copied().flatten(), lateral)
    }

    /// Whether `(ring, lateral)` lies inside the delete extents
    pub fn deletes(&self, ring: usize, lateral: usize) -> bool {
        within(self.delete_extents.get(ring).copied().flatten(), lateral)
    }
}

fn within(extent: Option<(usize, usize)>, lateral: usize) -> bool {
    extent.is_some_and(|(min, max)| lateral >= min && lateral <= max)
}

/// Band and circular masks for one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleMasks {
    pub band: HoleMask,
    pub circular: HoleMask,
    pub ring_count: usize,
    pub width_samples: usize,
}

impl HoleMasks {
    pub fn is_empty(&self) -> bool {
        self.band.is_empty() && self.circular.is_empty()
    }

    /// Combined delete mask of both variants
    pub fn deletes(&self, ring: usize, lateral: usize) -> bool {
        self.band.deletes(ring, lateral) || self.circular.deletes(ring, lateral)
    }

    /// Whether the grid cell from `(ring, lateral)` to `(ring + 1, lateral + 1)`
    /// is removed, which needs all four corners in the delete mask
    pub fn deletes_cell(&self, ring: usize, lateral: usize) -> bool {
        ring + 1 < self.ring_count
            && lateral + 1 < self.width_samples
            && self.deletes(ring, lateral)
            && self.deletes(ring, lateral + 1)
            && self.deletes(ring + 1, lateral)
            && self.deletes(ring + 1, lateral + 1)
    }

    /// Ring pairs whose outermost cell on each side is removed
    pub fn edge_hits(&self) -> EdgeHits {
        let mut hits = EdgeHits::none(self.ring_count);
        if self.width_samples < 2 {
            return hits;
        }
        let last_column = self.width_samples - 2;
        for pair in 0..self.ring_count.saturating_sub(1) {
            hits.left_cuts[pair] = self.deletes_cell(pair, 0);
            hits.right_cuts[pair] = self.deletes_cell(pair, last_column);
        }
        hits
    }
}

/// Rasterize every active hole spec onto the ring grid
///
/// `heights` holds the arc length ratio of each ring. The final ring belongs
/// to the tip fan and is never masked.
pub fn build_hole_masks(carves: &[CarveSpec], heights: &[f32], width_samples: usize) -> HoleMasks {
    let ring_count = heights.len();
    let mut band_rows = vec![vec![false; width_samples]; ring_count];
    let mut circular_rows = vec![vec![false; width_samples]; ring_count];
    let lateral_span = width_samples.saturating_sub(1).max(1) as f32;

    for spec in carves.iter().filter(|spec| spec.is_active()) {
        for ring in 0..ring_count.saturating_sub(1) {
            let length = heights[ring];
            for lateral in 0..width_samples {
                let u = lateral as f32 / lateral_span;
                match spec {
                    CarveSpec::BandHole(band) if band.contains(length, u) => {
                        band_rows[ring][lateral] = true;
                    }
                    CarveSpec::CircularHole(circle) if circle.contains(length, u) => {
                        circular_rows[ring][lateral] = true;
                    }
                    _ => {}
                }
            }
        }
    }

    let masks = HoleMasks {
        band: HoleMask::from_rows(&band_rows, width_samples, 0),
        circular: HoleMask::from_rows(&circular_rows, width_samples, CIRCULAR_DELETE_PADDING),
        ring_count,
        width_samples,
    };

    debug!(
        band = ?masks.band.range,
        circular = ?masks.circular.range,
        "built hole masks"
    );
    masks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::{BandHoleSpec, CircularHoleSpec};

    fn heights(count: usize) -> Vec<f32> {
        (0..count).map(|i| i as f32 / (count - 1) as f32).collect()
    }

    #[test]
    fn test_band_range_brackets_rings() {
        let carves = [CarveSpec::BandHole(BandHoleSpec {
            start: 0.2,
            end: 0.5,
            width: 0.3,
            center: 0.5,
        })];
        let h = heights(11);
        let masks = build_hole_masks(&carves, &h, 9);
        let range = masks.band.range.unwrap();
        assert_eq!(range.start_ring, 2);
        assert_eq!(range.end_ring, 5);
        assert!(masks.circular.is_empty());
        // Lateral samples 2..=6 sit within 0.3 of the center
        assert_eq!(masks.band.extents[3], Some((2, 6)));
        assert_eq!(masks.band.delete_extents[3], Some((2, 6)));
    }

    #[test]
    fn test_circular_delete_extents_are_padded() {
        let carves = [CarveSpec::CircularHole(CircularHoleSpec {
            center_length: 0.5,
            center_lateral: 0.5,
            radius: 0.1,
        })];
        let h = heights(11);
        let masks = build_hole_masks(&carves, &h, 9);
        assert_eq!(masks.circular.extents[5], Some((4, 4)));
        assert_eq!(masks.circular.delete_extents[5], Some((2, 6)));
        assert!(masks.deletes(5, 2));
        assert!(!masks.circular.contains(5, 2));
    }

    #[test]
    fn test_tip_ring_is_never_masked() {
        let carves = [CarveSpec::BandHole(BandHoleSpec {
            start: 0.0,
            end: 1.0,
            width: 1.0,
            center: 0.5,
        })];
        let h = heights(6);
        let masks = build_hole_masks(&carves, &h, 5);
        assert_eq!(masks.band.range.unwrap().end_ring, 4);
        assert_eq!(masks.band.extents[5], None);
    }

    #[test]
    fn test_edge_hits_follow_removed_cells() {
        let carves = [CarveSpec::BandHole(BandHoleSpec {
            start: 0.3,
            end: 0.6,
            width: 0.3,
            center: 1.0,
        })];
        let h = heights(11);
        let masks = build_hole_masks(&carves, &h, 5);
        let hits = masks.edge_hits();
        // Rings 3..=6 by samples 3..=4: cells of pairs 3, 4 and 5 go
        assert!(hits.is_cut(3, true) && hits.is_cut(5, true));
        assert!(!hits.is_cut(6, true));
        assert!(hits.is_hit(3, true) && hits.is_hit(6, true));
        assert!(!hits.is_hit(2, true));
        assert!(!hits.is_hit(4, false));
    }

    #[test]
    fn test_single_ring_band_hits_nothing() {
        let carves = [CarveSpec::BandHole(BandHoleSpec {
            start: 0.45,
            end: 0.55,
            width: 0.3,
            center: 1.0,
        })];
        let h = heights(11);
        let masks = build_hole_masks(&carves, &h, 5);
        // Ring 5 alone is masked, so no cell has all four corners inside
        assert!(masks.deletes(5, 4));
        assert!(!masks.deletes_cell(4, 3) && !masks.deletes_cell(5, 3));
        assert!(!masks.edge_hits().any());
    }

    #[test]
    fn test_inactive_specs_leave_no_mask() {
        let carves = [
            CarveSpec::None,
            CarveSpec::BandHole(BandHoleSpec {
                width: 0.0,
                ..Default::default()
            }),
        ];
        let masks = build_hole_masks(&carves, &heights(8), 5);
        assert!(masks.is_empty());
        assert!(!masks.edge_hits().any());
    }
}
