//! Configuration schema
//!
//! A hand-written table describing every [`BladeConfig`](crate::BladeConfig)
//! field for editors that build their own widgets: path, label, kind, range
//! and default. Generation clamps scalar settings to these ranges.

/// Widget kind of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
    Bool,
    /// One of a fixed set of snake_case names
    Enum(&'static [&'static str]),
    /// A [`KeyframeCurve`](crate::KeyframeCurve)
    Curve,
    /// A growable list of sub-records, fields listed under `path.`
    List,
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Float => "float",
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Enum(_) => "enum",
            FieldKind::Curve => "curve",
            FieldKind::List => "list",
        }
    }

    /// Whether [`FieldSpec::clamp`] applies
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Float | FieldKind::Int)
    }
}

/// Inclusive value range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min: f32,
    pub max: f32,
}

impl Constraints {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One configurable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Dotted path, list items as `list.field`
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub range: Option<Constraints>,
    /// Numeric default; enum index or 0/1 for bools
    pub default: f32,
}

impl FieldSpec {
    const fn float(path: &'static str, label: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            path,
            label,
            kind: FieldKind::Float,
            range: Some(Constraints::new(min, max)),
            default,
        }
    }

    const fn int(path: &'static str, label: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            path,
            label,
            kind: FieldKind::Int,
            range: Some(Constraints::new(min, max)),
            default,
        }
    }

    const fn other(path: &'static str, label: &'static str, kind: FieldKind, default: f32) -> Self {
        Self {
            path,
            label,
            kind,
            range: None,
            default,
        }
    }

    /// Clamp `value` into the field's range; integers are also rounded
    pub fn clamp(&self, value: f32) -> f32 {
        let value = match self.range {
            Some(range) => range.clamp(value),
            None => value,
        };
        if matches!(self.kind, FieldKind::Int) {
            value.round()
        } else {
            value
        }
    }

    /// Names of an enum field, empty otherwise
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            FieldKind::Enum(names) => names,
            _ => &[],
        }
    }
}

const QUALITY: &[&str] = &["low", "medium", "high", "ultra"];
const SHARP_SIDE: &[&str] = &["left", "right", "both"];
const PROFILE: &[&str] = &[
    "flat",
    "lenticular",
    "diamond",
    "hollow_ground",
    "hexagonal",
    "wedge",
    "triangular",
];
const CARVE: &[&str] = &["none", "groove", "band_hole", "circular_hole"];

static SCHEMA: &[FieldSpec] = &[
    FieldSpec::other("quality", "Quality", FieldKind::Enum(QUALITY), 1.0),
    FieldSpec::int("segment_subdivisions", "Segment Subdivisions", 1.0, 64.0, 4.0),
    FieldSpec::int("tip_subdivisions", "Tip Subdivisions", 1.0, 64.0, 6.0),
    FieldSpec::int("width_subdivisions", "Width Samples", 2.0, 129.0, 9.0),
    FieldSpec::other("layers", "Cross-Section Layers", FieldKind::List, 0.0),
    FieldSpec::other("layers.kind", "Profile", FieldKind::Enum(PROFILE), 0.0),
    FieldSpec::float("layers.start_height", "Start Height", 0.0, 1.0, 0.0),
    FieldSpec::float("layers.end_height", "End Height", 0.0, 1.0, 1.0),
    FieldSpec::other("layers.blend_curve", "Width Influence", FieldKind::Curve, 0.0),
    FieldSpec::float("layers.scale", "Thickness Scale", 0.0, 4.0, 1.0),
    FieldSpec::float("overlap_blend", "Overlap Blend", 0.0, 0.5, 0.1),
    FieldSpec::float("thickness", "Thickness", 0.0, 1.0, 0.04),
    FieldSpec::float("edge_sharpness", "Edge Sharpness", 0.0, 0.25, 0.01),
    FieldSpec::float("spine_thickness", "Spine Thickness", 0.0, 0.25, 0.002),
    FieldSpec::float("spine_offset", "Spine Offset", 0.0, 1.0, 0.5),
    FieldSpec::other("collapse_edges", "Collapse Edges", FieldKind::Bool, 1.0),
    FieldSpec::other("sharp_side", "Sharp Side", FieldKind::Enum(SHARP_SIDE), 2.0),
    FieldSpec::other("carves", "Carves", FieldKind::List, 0.0),
    FieldSpec::other("carves.kind", "Carve Kind", FieldKind::Enum(CARVE), 0.0),
    FieldSpec::float("carves.start", "Start", 0.0, 1.0, 0.1),
    FieldSpec::float("carves.end", "End", 0.0, 1.0, 0.8),
    FieldSpec::float("carves.depth", "Depth", 0.0, 1.0, 0.3),
    FieldSpec::float("carves.width", "Width", 0.0, 1.0, 0.3),
    FieldSpec::float("carves.center", "Lateral Center", 0.0, 1.0, 0.5),
    FieldSpec::other("carves.falloff", "Falloff", FieldKind::Curve, 0.0),
    FieldSpec::float("carves.center_length", "Length Center", 0.0, 1.0, 0.4),
    FieldSpec::float("carves.center_lateral", "Lateral Center", 0.0, 1.0, 0.5),
    FieldSpec::float("carves.radius", "Radius", 0.0, 0.5, 0.15),
    FieldSpec::int("hole_wall_segments", "Hole Wall Segments", 1.0, 16.0, 2.0),
    FieldSpec::float("tip_fade_power", "Tip Fade Power", 0.05, 4.0, 0.6),
];

/// Every configuration field, top-level fields before their list items
pub fn config_schema() -> &'static [FieldSpec] {
    SCHEMA
}

/// Look up a field by dotted path
pub fn find_field(path: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|field| field.path == path)
}

/// Clamp `value` to the range of `path`, unchanged for unknown fields
pub fn clamp_field(path: &str, value: f32) -> f32 {
    find_field(path).map_or(value, |field| field.clamp(value))
}
