//! blade-cli library
//!
//! Loading of blade presets and skeletons from TOML, and an OBJ dump of the
//! generated mesh for inspection in a DCC tool.

pub mod obj;
pub mod preset;

pub use obj::{write_obj, write_obj_to};
pub use preset::{SkeletonFile, demo_skeleton, load_preset, load_skeleton, save_skeleton};
