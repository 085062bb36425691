//! Validation errors
//!
//! Generation itself never fails: it clamps, skips or returns an empty mesh.
//! These errors exist for hosts that want to reject bad input up front.

use crate::types::Segment;

/// Problems with a skeleton or configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BladeError {
    /// Fewer than two segments
    #[error("skeleton has {provided} segments, need at least 2")]
    InsufficientSkeleton { provided: usize },

    /// A segment contains NaN or infinite coordinates
    #[error("segment {index} has a non-finite coordinate")]
    NonFiniteSegment { index: usize },

    /// Layer height range is inverted or outside [0, 1]
    #[error("layer {index} has invalid height range {start}..{end}")]
    InvalidLayerRange { index: usize, start: f32, end: f32 },

    /// Subdivision count too small to build a surface
    #[error("{field} is too small to build a surface, got {value}")]
    InvalidSubdivisions { field: &'static str, value: u32 },

    /// Negative or non-finite scalar setting
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidScalar { field: &'static str, value: f32 },
}

/// Check a skeleton before handing it to generation
pub fn validate_skeleton(segments: &[Segment]) -> Result<(), BladeError> {
    if segments.len() < 2 {
        return Err(BladeError::InsufficientSkeleton {
            provided: segments.len(),
        });
    }
    if let Some(index) = segments.iter().position(|s| !s.is_finite()) {
        return Err(BladeError::NonFiniteSegment { index });
    }
    Ok(())
}
