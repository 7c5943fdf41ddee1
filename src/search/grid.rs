//! Discrete scale and rotation grids explored by the geometric search.

use crate::util::{TagMatchError, TagMatchResult};

/// Template scale factors relative to the reference icon size, ascending.
pub const DEFAULT_SCALES: [f32; 17] = [
    0.4, 0.5, 0.6, 0.7, 0.8, 0.85, 0.9, 0.95, 1.0, 1.05, 1.1, 1.15, 1.2, 1.3, 1.4, 1.5, 1.6,
];

/// Template rotations in degrees.
pub const DEFAULT_ANGLES_DEG: [f32; 9] = [-20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0];

/// Validates a scale grid: non-empty, finite, strictly positive.
pub(crate) fn check_scales(scales: &[f32]) -> TagMatchResult<()> {
    if scales.is_empty() {
        return Err(TagMatchError::InvalidConfig("scale grid is empty"));
    }
    if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(TagMatchError::InvalidConfig("scale factors must be finite and > 0"));
    }
    Ok(())
}

/// Validates a rotation grid: non-empty and finite.
pub(crate) fn check_angles(angles_deg: &[f32]) -> TagMatchResult<()> {
    if angles_deg.is_empty() {
        return Err(TagMatchError::InvalidConfig("rotation grid is empty"));
    }
    if angles_deg.iter().any(|a| !a.is_finite()) {
        return Err(TagMatchError::InvalidConfig("rotation angles must be finite"));
    }
    Ok(())
}
