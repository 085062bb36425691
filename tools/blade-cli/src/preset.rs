//! Preset and skeleton files
//!
//! A preset is a [`BladeConfig`] in TOML. A skeleton file lists segments
//! from base to tip:
//!
//! ```toml
//! [[segments]]
//! center = [0.0, 0.0, 0.0]
//! left = [-0.1, 0.0, 0.0]
//! right = [0.1, 0.0, 0.0]
//! ```

use anyhow::{Context, Result};
use blade_mesh::{BladeConfig, Segment};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFile {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Load and parse a preset file
pub fn load_preset(path: &Path) -> Result<BladeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset: {:?}", path))?;
    let config: BladeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse preset: {:?}", path))?;
    Ok(config)
}

/// Load and parse a skeleton file
pub fn load_skeleton(path: &Path) -> Result<Vec<Segment>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read skeleton: {:?}", path))?;
    let file: SkeletonFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse skeleton: {:?}", path))?;
    Ok(file.segments)
}

/// Write `segments` as a skeleton file
pub fn save_skeleton(path: &Path, segments: &[Segment]) -> Result<()> {
    let file = SkeletonFile {
        segments: segments.to_vec(),
    };
    let content = toml::to_string_pretty(&file).context("Failed to serialize skeleton")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write skeleton: {:?}", path))?;
    Ok(())
}

/// Straight blade along +Y, tapering linearly from `base_width` to a point
///
/// `count` is raised to 2.
pub fn demo_skeleton(count: usize, length: f32, base_width: f32) -> Vec<Segment> {
    let count = count.max(2);
    let last = (count - 1) as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / last;
            let center = Vec3::new(0.0, t * length, 0.0);
            Segment::symmetric(center, Vec3::X, base_width * 0.5 * (1.0 - t))
        })
        .collect()
}
