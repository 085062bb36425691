//! Procedural blade meshes
//!
//! Turns a sparse skeleton of cross-section [`Segment`]s into a closed
//! triangle surface with a layered thickness profile, a beveled cutting
//! edge in its own submesh, and optional grooves and holes.
//!
//! # Example
//! ```
//! use blade_mesh::{BladeConfig, Segment, generate_blade};
//! use glam::Vec3;
//!
//! let segments: Vec<Segment> = (0..4)
//!     .map(|i| {
//!         let half = 0.1 * (1.0 - i as f32 / 3.0);
//!         Segment::symmetric(Vec3::new(0.0, i as f32 * 0.3, 0.0), Vec3::X, half)
//!     })
//!     .collect();
//!
//! let blade = generate_blade(&segments, &BladeConfig::default());
//! assert!(!blade.is_empty());
//! ```
//!
//! Generation is a single synchronous call with no shared state. It never
//! fails; use [`validate_skeleton`] and [`BladeConfig::validate`] to reject
//! input up front.

pub mod bevel;
pub mod carve;
pub mod config;
pub mod curve;
pub mod error;
pub mod math;
pub mod normals;
pub mod pipeline;
pub mod profile;
pub mod sampler;
pub mod schema;
pub mod surface;
pub mod types;
pub mod uv;

pub use carve::{BandHoleSpec, CarveSpec, CircularHoleSpec, GrooveSpec, random_carves};
pub use config::{BladeConfig, Quality, QualitySettings, SharpSide};
pub use curve::{ControlCurve, CurveKey, KeyframeCurve};
pub use error::{BladeError, validate_skeleton};
pub use pipeline::generate_blade;
pub use profile::{CrossSectionLayer, ProfileKind};
pub use types::{
    BladeMesh, GenerationReport, HoleReport, HollowRange, MeshBuffers, MeshLayout, MeshPass,
    Segment, Submesh,
};
