//! Pixel-to-physical-unit calibration
//!
//! The scale factor comes from a reference measurement: two points clicked
//! on a live frame plus the real-world distance between them. The resulting
//! pixels-per-unit scalar is stored in the profile store and divides every
//! reported dimension from then on.

use crate::error::{GaugeError, Result};

/// Derive the pixels-per-unit scale from a reference segment.
///
/// `real_distance` is in whatever physical unit the operator measured in
/// (millimeters on the production rig). Non-positive distances and
/// coincident points are caller input errors; no scale is produced.
pub fn pixels_per_unit(p1: (f32, f32), p2: (f32, f32), real_distance: f32) -> Result<f32> {
    if !real_distance.is_finite() || real_distance <= 0.0 {
        return Err(GaugeError::InvalidScale {
            value: real_distance,
        });
    }

    let (dx, dy) = (p1.0 - p2.0, p1.1 - p2.1);
    let pixel_distance = (dx * dx + dy * dy).sqrt();
    if pixel_distance <= 0.0 {
        return Err(GaugeError::InvalidScale { value: 0.0 });
    }

    Ok(pixel_distance / real_distance)
}
