//! Skeleton resampling
//!
//! Turns the sparse segment list into a dense run of rings. Every interval
//! between two segments is walked with Catmull-Rom splines evaluated
//! independently for the center and both extents. Extents that collapse onto
//! the center at one end of an interval fade in or out over the interval
//! instead of snapping, and a final moving-average pass irons out the kinks
//! those transitions leave behind.

use glam::Vec3;
use tracing::debug;

use crate::curve::ControlCurve;
use crate::math::{catmull_rom_clamped, lerp, smoothstep};
use crate::types::Segment;

/// Extents closer than this to the center count as collapsed
pub const COLLAPSE_EPSILON: f32 = 1e-4;

/// Neighbour reach of the smoothing pass
const SMOOTHING_WINDOW: usize = 2;

/// Blend toward the neighbourhood average in the smoothing pass
const SMOOTHING_STRENGTH: f32 = 0.4;

/// Resampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    pub segment_subdivisions: u32,
    pub tip_subdivisions: u32,
    /// Lateral ratio of the spine between left (0) and right (1)
    pub spine_offset: f32,
    pub collapse_edges: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            segment_subdivisions: 4,
            tip_subdivisions: 6,
            spine_offset: 0.5,
            collapse_edges: true,
        }
    }
}

/// Dense rings produced from the skeleton, as parallel arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledSkeleton {
    /// Ring centers after the spine offset
    pub centers: Vec<Vec3>,
    pub lefts: Vec<Vec3>,
    pub rights: Vec<Vec3>,
    /// Interpolated centers without the spine offset, used for thickness
    pub geometric_centers: Vec<Vec3>,
    /// Where the spine sits between left (0) and right (1), per ring
    pub spine_ratios: Vec<f32>,
}

impl SampledSkeleton {
    pub fn ring_count(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Cumulative arc length of every ring along the geometric centers,
    /// normalised to [0, 1]
    ///
    /// The spine offset does not move these, so every height-driven stage
    /// sees the same ratios.
    pub fn arc_length_ratios(&self) -> Vec<f32> {
        normalized_arc_lengths(&self.geometric_centers)
    }

    /// Widest left-to-right extent of any ring
    pub fn max_width(&self) -> f32 {
        self.lefts
            .iter()
            .zip(&self.rights)
            .map(|(l, r)| l.distance(*r))
            .fold(0.0, f32::max)
    }
}

fn normalized_arc_lengths(points: &[Vec3]) -> Vec<f32> {
    let count = points.len();
    let mut lengths = Vec::with_capacity(count);
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += point.distance(points[i - 1]);
        }
        lengths.push(total);
    }

    if total <= f32::EPSILON {
        return (0..count).map(|i| parametric_ratio(i, count)).collect();
    }
    lengths.iter().map(|l| l / total).collect()
}

fn parametric_ratio(index: usize, count: usize) -> f32 {
    if count < 2 {
        0.0
    } else {
        index as f32 / (count - 1) as f32
    }
}

/// Number of rings produced for `segment_count` segments
///
/// Each interval contributes `subdivisions + 1` samples and neighbouring
/// intervals share their endpoint sample.
pub fn ring_count(segment_count: usize, segment_subdivisions: u32, tip_subdivisions: u32) -> usize {
    if segment_count < 2 {
        return 0;
    }
    let intervals = segment_count - 1;
    let samples: usize = (0..intervals)
        .map(|i| interval_subdivisions(i, intervals, segment_subdivisions, tip_subdivisions) + 1)
        .sum();
    samples - (intervals - 1)
}

fn interval_subdivisions(
    interval: usize,
    intervals: usize,
    segment_subdivisions: u32,
    tip_subdivisions: u32,
) -> usize {
    let subdivisions = if interval + 1 == intervals {
        tip_subdivisions
    } else {
        segment_subdivisions
    };
    subdivisions.max(1) as usize
}

fn is_collapsed(extent: Vec3, center: Vec3) -> bool {
    extent.distance(center) < COLLAPSE_EPSILON
}

/// One ring before width scaling and spine offset
struct RawRing {
    center: Vec3,
    left: Vec3,
    right: Vec3,
    left_collapse: f32,
    right_collapse: f32,
}

/// Resample `segments` into rings
///
/// `width_scale` maps a ring's arc length ratio to a multiplier on its
/// half-widths. Fewer than two segments yields an empty skeleton.
pub fn sample_skeleton(
    segments: &[Segment],
    settings: &SamplerSettings,
    width_scale: &impl ControlCurve,
) -> SampledSkeleton {
    if segments.len() < 2 {
        return SampledSkeleton::default();
    }

    let raw = interpolate_rings(segments, settings);
    let count = raw.len();

    // Geometric centers are final before any width work, so the width scale
    // can be sampled at the same heights as thickness and carving
    let mut geometric_centers: Vec<Vec3> = raw.iter().map(|ring| ring.center).collect();
    smooth_pinned(&mut geometric_centers);
    let heights = normalized_arc_lengths(&geometric_centers);

    let mut skeleton = SampledSkeleton {
        centers: Vec::with_capacity(count),
        lefts: Vec::with_capacity(count),
        rights: Vec::with_capacity(count),
        geometric_centers,
        spine_ratios: Vec::with_capacity(count),
    };

    let spine_offset = settings.spine_offset.clamp(0.0, 1.0);
    for (ring, height) in raw.iter().zip(&heights) {
        let scale = width_scale.sample(*height).max(0.0);
        let center = ring.center;
        let left = (center + (ring.left - center) * scale).lerp(center, ring.left_collapse);
        let right = (center + (ring.right - center) * scale).lerp(center, ring.right_collapse);

        // The spine offset only applies where neither extent is collapsing
        let collapse = ring.left_collapse.max(ring.right_collapse);
        let offset_center = left.lerp(right, spine_offset);

        skeleton.centers.push(offset_center.lerp(center, collapse));
        skeleton.spine_ratios.push(lerp(spine_offset, 0.5, collapse));
        skeleton.lefts.push(left);
        skeleton.rights.push(right);
    }

    smooth_pinned(&mut skeleton.centers);
    smooth_pinned(&mut skeleton.lefts);
    smooth_pinned(&mut skeleton.rights);

    debug!(
        segments = segments.len(),
        rings = skeleton.ring_count(),
        "sampled skeleton"
    );
    skeleton
}

fn interpolate_rings(segments: &[Segment], settings: &SamplerSettings) -> Vec<RawRing> {
    let n = segments.len();
    let intervals = n - 1;
    let mut rings = Vec::with_capacity(ring_count(
        n,
        settings.segment_subdivisions,
        settings.tip_subdivisions,
    ));

    for i in 0..intervals {
        let s0 = &segments[i.saturating_sub(1)];
        let s1 = &segments[i];
        let s2 = &segments[i + 1];
        let s3 = &segments[(i + 2).min(n - 1)];

        let subdivisions = interval_subdivisions(
            i,
            intervals,
            settings.segment_subdivisions,
            settings.tip_subdivisions,
        );

        let (left_from, left_to, right_from, right_to) = if settings.collapse_edges {
            (
                f32::from(u8::from(is_collapsed(s1.left, s1.center))),
                f32::from(u8::from(is_collapsed(s2.left, s2.center))),
                f32::from(u8::from(is_collapsed(s1.right, s1.center))),
                f32::from(u8::from(is_collapsed(s2.right, s2.center))),
            )
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };

        // Shared endpoints are emitted once, by the earlier interval
        let first_step = if i == 0 { 0 } else { 1 };
        for step in first_step..=subdivisions {
            let t = step as f32 / subdivisions as f32;
            let fade = smoothstep(0.0, 1.0, t);
            rings.push(RawRing {
                center: catmull_rom_clamped(s0.center, s1.center, s2.center, s3.center, t),
                left: catmull_rom_clamped(s0.left, s1.left, s2.left, s3.left, t),
                right: catmull_rom_clamped(s0.right, s1.right, s2.right, s3.right, t),
                left_collapse: lerp(left_from, left_to, fade),
                right_collapse: lerp(right_from, right_to, fade),
            });
        }
    }

    rings
}

/// Symmetric moving average with the first and last points held in place
fn smooth_pinned(points: &mut [Vec3]) {
    let n = points.len();
    if n < 3 {
        return;
    }
    let source = points.to_vec();
    for i in 1..n - 1 {
        let lo = i.saturating_sub(SMOOTHING_WINDOW);
        let hi = (i + SMOOTHING_WINDOW).min(n - 1);
        let window = &source[lo..=hi];
        let average = window.iter().copied().sum::<Vec3>() / window.len() as f32;
        points[i] = source[i].lerp(average, SMOOTHING_STRENGTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn straight_blade(count: usize) -> Vec<Segment> {
        (0..count)
            .map(|i| {
                let y = i as f32;
                let half = if i + 1 == count { 0.0 } else { 0.5 };
                Segment::symmetric(Vec3::new(0.0, y, 0.0), Vec3::X, half)
            })
            .collect()
    }

    fn unit_width(_: f32) -> f32 {
        1.0
    }

    #[test]
    fn test_ring_count_formula() {
        assert_eq!(ring_count(5, 3, 5), 3 * 3 + 5 + 1);
        assert_eq!(ring_count(2, 3, 5), 6);
        assert_eq!(ring_count(1, 3, 5), 0);
        // Zero subdivisions are treated as one
        assert_eq!(ring_count(3, 0, 0), 3);
    }

    #[test]
    fn test_sampled_ring_count_matches_formula() {
        let segments = straight_blade(5);
        let settings = SamplerSettings {
            segment_subdivisions: 3,
            tip_subdivisions: 5,
            ..Default::default()
        };
        let skeleton = sample_skeleton(&segments, &settings, &unit_width);
        assert_eq!(skeleton.ring_count(), ring_count(5, 3, 5));
        assert_eq!(skeleton.lefts.len(), skeleton.ring_count());
        assert_eq!(skeleton.geometric_centers.len(), skeleton.ring_count());
    }

    #[test]
    fn test_endpoints_match_segments() {
        let segments = straight_blade(4);
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &unit_width);
        let last = skeleton.ring_count() - 1;
        assert!(skeleton.centers[0].distance(segments[0].center) < 1e-5);
        assert!(skeleton.lefts[0].distance(segments[0].left) < 1e-5);
        assert!(skeleton.centers[last].distance(segments[3].center) < 1e-5);
    }

    #[test]
    fn test_centers_monotonic_along_growth_axis() {
        let segments = straight_blade(6);
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &unit_width);
        for pair in skeleton.centers.windows(2) {
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn test_single_segment_produces_nothing() {
        let segments = straight_blade(1);
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &unit_width);
        assert!(skeleton.is_empty());
    }

    #[test]
    fn test_collapsing_edge_fades_in() {
        // Left extent collapses onto the center at the last segment only
        let segments = vec![
            Segment::symmetric(Vec3::ZERO, Vec3::X, 0.5),
            Segment::symmetric(Vec3::Y, Vec3::X, 0.5),
            Segment::new(Vec3::Y * 2.0, Vec3::Y * 2.0, Vec3::new(0.5, 2.0, 0.0)),
        ];
        let settings = SamplerSettings {
            segment_subdivisions: 4,
            tip_subdivisions: 8,
            ..Default::default()
        };
        let skeleton = sample_skeleton(&segments, &settings, &unit_width);
        let last = skeleton.ring_count() - 1;
        assert!(skeleton.lefts[last].distance(skeleton.centers[last]) < 1e-4);

        // Half widths shrink steadily rather than jumping
        let widths: Vec<f32> = (0..skeleton.ring_count())
            .map(|i| skeleton.lefts[i].distance(skeleton.geometric_centers[i]))
            .collect();
        for pair in widths[4..].windows(2) {
            assert!(pair[0] - pair[1] < 0.2, "left extent snapped: {pair:?}");
        }
    }

    #[test]
    fn test_spine_offset_moves_center_only() {
        let segments = straight_blade(3);
        let settings = SamplerSettings {
            spine_offset: 0.25,
            collapse_edges: false,
            ..Default::default()
        };
        let skeleton = sample_skeleton(&segments, &settings, &unit_width);
        let expected = skeleton.lefts[1].lerp(skeleton.rights[1], 0.25);
        assert!(skeleton.centers[1].distance(expected) < 0.05);
        assert!(skeleton.geometric_centers[1].x.abs() < 1e-4);
        assert!((skeleton.spine_ratios[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_spine_ratio_centers_on_collapsed_rings() {
        let segments = straight_blade(3);
        let settings = SamplerSettings {
            spine_offset: 0.2,
            ..Default::default()
        };
        let skeleton = sample_skeleton(&segments, &settings, &unit_width);
        let last = skeleton.ring_count() - 1;
        assert!((skeleton.spine_ratios[0] - 0.2).abs() < 1e-6);
        assert!((skeleton.spine_ratios[last] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_width_scale_applied() {
        let segments = straight_blade(3);
        let half = |_: f32| 0.5;
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &half);
        assert!((skeleton.lefts[0].distance(skeleton.rights[0]) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_width_scale_sampled_at_arc_length() {
        // Uneven segment spacing pulls arc length away from the ring index
        let segments = vec![
            Segment::symmetric(Vec3::ZERO, Vec3::X, 0.5),
            Segment::symmetric(Vec3::Y * 0.2, Vec3::X, 0.5),
            Segment::symmetric(Vec3::Y * 3.0, Vec3::X, 0.5),
        ];
        let seen = RefCell::new(Vec::new());
        let recording = |height: f32| {
            seen.borrow_mut().push(height);
            1.0
        };
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &recording);

        let heights = skeleton.arc_length_ratios();
        assert_eq!(*seen.borrow(), heights);
        let parametric = 1.0 / (skeleton.ring_count() - 1) as f32;
        assert!((heights[1] - parametric).abs() > 0.01);
    }

    #[test]
    fn test_arc_length_ignores_spine_offset() {
        let segments = straight_blade(4);
        let centered = sample_skeleton(&segments, &SamplerSettings::default(), &unit_width);
        let offset = SamplerSettings {
            spine_offset: 0.1,
            ..Default::default()
        };
        let shifted = sample_skeleton(&segments, &offset, &unit_width);
        assert_eq!(centered.arc_length_ratios(), shifted.arc_length_ratios());
    }

    #[test]
    fn test_arc_length_ratios_span_unit_interval() {
        let segments = straight_blade(4);
        let skeleton = sample_skeleton(&segments, &SamplerSettings::default(), &unit_width);
        let ratios = skeleton.arc_length_ratios();
        assert_eq!(ratios[0], 0.0);
        assert!((ratios[ratios.len() - 1] - 1.0).abs() < 1e-6);
        assert!(ratios.windows(2).all(|w| w[1] >= w[0]));
    }
}
