//! End-to-end generation
//!
//! One call runs every stage in order on freshly allocated buffers:
//! sample the skeleton, build the front and back faces, carve grooves, mask
//! holes and snap their padding, build the bevel ridges, assign UVs, cut
//! holes, stitch the bevel faces and finally recompute normals. Nothing is
//! cached between calls.

use tracing::{debug, debug_span, warn};

use crate::bevel::{BevelSettings, build_ridges, connect_bevels, lateral_directions};
use crate::carve::{
    CarveSpec, GrooveInput, HoleCarveInput, build_hole_masks, carve_grooves, carve_holes,
    snap_padding,
};
use crate::config::BladeConfig;
use crate::normals::RecalculateNormals;
use crate::profile::{CrossSectionLayer, blend_width_scale};
use crate::sampler::{SamplerSettings, sample_skeleton};
use crate::schema;
use crate::surface::{ThicknessSettings, build_back, build_front};
use crate::types::{BladeMesh, GenerationReport, HoleReport, MeshBuffers, Segment};
use crate::uv::UvMapper;

/// Settings after clamping to the schema ranges
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    segment_subdivisions: u32,
    tip_subdivisions: u32,
    width_samples: usize,
    bevel_smoothness: f32,
    overlap_blend: f32,
    thickness: f32,
    edge_sharpness: f32,
    spine_thickness: f32,
    spine_offset: f32,
    hole_wall_segments: u32,
    tip_fade_power: f32,
    layers: Vec<CrossSectionLayer>,
    /// Active carves only
    carves: Vec<CarveSpec>,
}

/// Clamp `value` into the schema range of `path`, warning when it moves
fn clamp_setting(path: &str, value: f32) -> f32 {
    let Some(field) = schema::find_field(path).filter(|field| field.kind.is_numeric()) else {
        return value;
    };
    if !value.is_finite() {
        warn!(field = path, value, default = field.default, "non-finite setting, using default");
        return field.default;
    }
    let clamped = field.clamp(value);
    if clamped != value {
        warn!(field = path, value, clamped, "setting out of range, clamping");
    }
    clamped
}

impl Resolved {
    fn from_config(config: &BladeConfig) -> Self {
        let settings = config.resolved_settings();
        let count = |path: &str, value: u32| clamp_setting(path, value as f32) as u32;
        Self {
            segment_subdivisions: count("segment_subdivisions", settings.segment_subdivisions),
            tip_subdivisions: count("tip_subdivisions", settings.tip_subdivisions),
            width_samples: count("width_subdivisions", settings.width_subdivisions) as usize,
            bevel_smoothness: settings.bevel_smoothness,
            overlap_blend: clamp_setting("overlap_blend", config.overlap_blend),
            thickness: clamp_setting("thickness", config.thickness),
            edge_sharpness: clamp_setting("edge_sharpness", config.edge_sharpness),
            spine_thickness: clamp_setting("spine_thickness", config.spine_thickness),
            spine_offset: clamp_setting("spine_offset", config.spine_offset),
            hole_wall_segments: count("hole_wall_segments", config.hole_wall_segments),
            tip_fade_power: clamp_setting("tip_fade_power", config.tip_fade_power),
            layers: config.layers.iter().map(clamp_layer).collect(),
            carves: config
                .carves
                .iter()
                .filter(|spec| spec.is_active())
                .map(clamp_carve)
                .collect(),
        }
    }
}

fn clamp_layer(layer: &CrossSectionLayer) -> CrossSectionLayer {
    CrossSectionLayer {
        start_height: clamp_setting("layers.start_height", layer.start_height),
        end_height: clamp_setting("layers.end_height", layer.end_height),
        scale: clamp_setting("layers.scale", layer.scale),
        ..layer.clone()
    }
}

fn clamp_carve(spec: &CarveSpec) -> CarveSpec {
    let mut spec = spec.clone();
    match &mut spec {
        CarveSpec::None => {}
        CarveSpec::Groove(groove) => {
            groove.start = clamp_setting("carves.start", groove.start);
            groove.end = clamp_setting("carves.end", groove.end);
            groove.depth = clamp_setting("carves.depth", groove.depth);
            groove.width = clamp_setting("carves.width", groove.width);
            groove.center = clamp_setting("carves.center", groove.center);
        }
        CarveSpec::BandHole(band) => {
            band.start = clamp_setting("carves.start", band.start);
            band.end = clamp_setting("carves.end", band.end);
            band.width = clamp_setting("carves.width", band.width);
            band.center = clamp_setting("carves.center", band.center);
        }
        CarveSpec::CircularHole(circle) => {
            circle.center_length = clamp_setting("carves.center_length", circle.center_length);
            circle.center_lateral = clamp_setting("carves.center_lateral", circle.center_lateral);
            circle.radius = clamp_setting("carves.radius", circle.radius);
        }
    }
    spec
}

/// Build a blade mesh from `segments`
///
/// Never fails. Fewer than two segments, or a segment with non-finite
/// coordinates, gives an empty mesh; out-of-range settings are clamped and
/// inactive carves are skipped.
pub fn generate_blade(segments: &[Segment], config: &BladeConfig) -> BladeMesh {
    let span = debug_span!("generate_blade", segments = segments.len());
    let _enter = span.enter();

    if segments.len() < 2 {
        warn!(segments = segments.len(), "skeleton needs at least 2 segments, nothing generated");
        return BladeMesh::empty();
    }
    if let Some(index) = segments.iter().position(|s| !s.is_finite()) {
        warn!(index, "segment has non-finite coordinates, nothing generated");
        return BladeMesh::empty();
    }

    let resolved = Resolved::from_config(config);
    for spec in config.carves.iter().filter(|s| !s.is_active()) {
        debug!(kind = spec.kind_name(), "skipping inactive carve");
    }

    // Skeleton
    let sampler = SamplerSettings {
        segment_subdivisions: resolved.segment_subdivisions,
        tip_subdivisions: resolved.tip_subdivisions,
        spine_offset: resolved.spine_offset,
        collapse_edges: config.collapse_edges,
    };
    let width_scale =
        |height: f32| blend_width_scale(&resolved.layers, height, resolved.overlap_blend);
    let skeleton = sample_skeleton(segments, &sampler, &width_scale);

    // Front and back faces
    let mut buffers = MeshBuffers::new();
    let layout = build_front(&skeleton, resolved.width_samples, &mut buffers);
    let thickness = ThicknessSettings {
        thickness: resolved.thickness,
        overlap_blend: resolved.overlap_blend,
        tip_subdivisions: resolved.tip_subdivisions,
        tip_fade_power: resolved.tip_fade_power,
    };
    let frame = build_back(&skeleton, &layout, &resolved.layers, &thickness, &mut buffers);

    // Grooves move vertices only, so the bevel below follows them
    let max_groove_depth = carve_grooves(
        &resolved.carves,
        &GrooveInput {
            layout: &layout,
            frame: &frame,
            thickness: resolved.thickness,
            blade_width: skeleton.max_width(),
        },
        &mut buffers,
    );

    // Padding snaps before the ridges so collapsed ridges follow it
    let masks = build_hole_masks(&resolved.carves, &frame.ring_heights, layout.width_samples);
    let hits = masks.edge_hits();
    let snapped_vertices = snap_padding(&layout, &masks, &mut buffers);

    // Bevel ridges
    let bevel = BevelSettings {
        edge_sharpness: resolved.edge_sharpness,
        spine_thickness: resolved.spine_thickness,
        bevel_smoothness: resolved.bevel_smoothness,
        sharp_side: config.sharp_side,
    };
    let lateral = lateral_directions(&skeleton, &layout, &frame, &buffers);
    for front_side in [true, false] {
        build_ridges(&layout, &frame, &lateral, &hits, &bevel, front_side, &mut buffers);
    }

    buffers.apply(UvMapper {
        layout: &layout,
        heights: &frame.ring_heights,
    });

    let carved = carve_holes(
        &HoleCarveInput {
            layout: &layout,
            masks: &masks,
            wall_segments: resolved.hole_wall_segments,
        },
        &mut buffers,
    );

    // Bevel faces last, so they can meet the hole walls on the border
    connect_bevels(&layout, &hits, &carved.chains, config.sharp_side, &mut buffers);

    buffers.apply(RecalculateNormals::default());

    debug!(
        vertices = buffers.vertex_count(),
        triangles = buffers.triangle_count(),
        "generated blade"
    );

    BladeMesh {
        buffers,
        layout,
        report: GenerationReport {
            ring_count: layout.ring_count,
            max_groove_depth,
            holes: HoleReport {
                snapped_vertices,
                ..carved.report
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::{CircularHoleSpec, GrooveSpec};
    use crate::profile::ProfileKind;
    use glam::Vec3;

    fn blade() -> Vec<Segment> {
        (0..4)
            .map(|i| {
                let half = 0.1 * (1.0 - i as f32 / 3.0);
                Segment::symmetric(Vec3::new(0.0, i as f32 * 0.3, 0.0), Vec3::X, half)
            })
            .collect()
    }

    #[test]
    fn test_clamp_setting() {
        assert_eq!(clamp_setting("spine_offset", 2.0), 1.0);
        assert_eq!(clamp_setting("thickness", f32::NAN), 0.04);
        assert_eq!(clamp_setting("thickness", 0.2), 0.2);
    }

    #[test]
    fn test_resolved_clamps_subdivisions() {
        let config = BladeConfig {
            width_subdivisions: Some(1),
            segment_subdivisions: Some(0),
            ..Default::default()
        };
        let resolved = Resolved::from_config(&config);
        assert_eq!(resolved.width_samples, 2);
        assert_eq!(resolved.segment_subdivisions, 1);
    }

    #[test]
    fn test_clamp_setting_skips_non_numeric_fields() {
        assert_eq!(clamp_setting("quality", 7.0), 7.0);
        assert_eq!(clamp_setting("no_such_field", -3.0), -3.0);
    }

    #[test]
    fn test_resolved_clamps_layers_and_carves() {
        let config = BladeConfig {
            layers: vec![
                CrossSectionLayer::new(ProfileKind::Diamond, -0.5, 1.0).with_scale(50.0),
            ],
            carves: vec![
                CarveSpec::CircularHole(CircularHoleSpec {
                    center_length: 0.4,
                    center_lateral: 1.5,
                    radius: 3.0,
                }),
                CarveSpec::Groove(GrooveSpec {
                    depth: 2.0,
                    ..Default::default()
                }),
                CarveSpec::None,
            ],
            ..Default::default()
        };
        let resolved = Resolved::from_config(&config);

        let layer = &resolved.layers[0];
        assert_eq!(layer.scale, 4.0);
        assert_eq!(layer.start_height, 0.0);
        assert_eq!(layer.kind, ProfileKind::Diamond);

        assert_eq!(resolved.carves.len(), 2);
        let CarveSpec::CircularHole(circle) = &resolved.carves[0] else {
            panic!("expected a circular hole, got {:?}", resolved.carves[0]);
        };
        assert_eq!(circle.radius, 0.5);
        assert_eq!(circle.center_lateral, 1.0);
        let CarveSpec::Groove(groove) = &resolved.carves[1] else {
            panic!("expected a groove, got {:?}", resolved.carves[1]);
        };
        assert_eq!(groove.depth, 1.0);
    }

    #[test]
    fn test_generate_fills_every_block() {
        let mesh = generate_blade(&blade(), &BladeConfig::default());
        let layout = mesh.layout;
        assert_eq!(mesh.buffers.vertex_count(), layout.wall_start);
        assert_eq!(mesh.buffers.normals.len(), layout.wall_start);
        assert_eq!(mesh.buffers.uvs.len(), layout.wall_start);
        assert!(!mesh.buffers.triangles_edge.is_empty());
        assert_eq!(mesh.report.ring_count, layout.ring_count);
    }

    #[test]
    fn test_non_finite_segment_gives_empty_mesh() {
        let mut segments = blade();
        segments[1].left.x = f32::INFINITY;
        assert!(generate_blade(&segments, &BladeConfig::default()).is_empty());
    }
}
