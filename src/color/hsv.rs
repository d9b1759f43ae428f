//! RGB to HSV conversion in the byte-quantized convention
//!
//! Hue is mapped to [0, 180] and saturation/value to [0, 255] so that the
//! thresholds in existing profile data keep their meaning. This is a fixed
//! domain choice, not degrees in [0, 360].

use image::Rgb;
use palette::{FromColor, Hsv, Srgb};

use crate::constants::{picking, segmentation::HUE_MAX};

/// One pixel in the byte-quantized HSV domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    /// Hue in [0, 180]
    pub h: u8,
    /// Saturation in [0, 255]
    pub s: u8,
    /// Value in [0, 255]
    pub v: u8,
}

impl Hsv8 {
    /// Inclusive per-channel containment test against a threshold window
    pub fn in_range(&self, lower: [u8; 3], upper: [u8; 3]) -> bool {
        lower[0] <= self.h
            && self.h <= upper[0]
            && lower[1] <= self.s
            && self.s <= upper[1]
            && lower[2] <= self.v
            && self.v <= upper[2]
    }
}

/// Convert one RGB pixel to quantized HSV.
///
/// The continuous conversion comes from `palette`; quantization halves the
/// hue angle and scales saturation/value to bytes, keeping existing
/// threshold data valid to within one count.
pub fn rgb_to_hsv8(pixel: Rgb<u8>) -> Hsv8 {
    let [r, g, b] = pixel.0;
    let srgb = Srgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
    let hsv = Hsv::from_color(srgb);

    let h = (hsv.hue.into_positive_degrees() / 2.0).round() as u16;
    let s = (hsv.saturation * 255.0).round() as u16;
    let v = (hsv.value * 255.0).round() as u16;

    Hsv8 {
        h: h.min(u16::from(HUE_MAX)) as u8,
        s: s.min(255) as u8,
        v: v.min(255) as u8,
    }
}

/// Derive a starting threshold window from one sampled pixel.
///
/// Hue gets a symmetric +/-10 window clamped to the hue domain; saturation
/// and value get generous lower bounds so lighting variation across the
/// object does not immediately break the mask. This mirrors the
/// click-to-pick behavior of the tuning tool.
pub fn pick_window(sample: Hsv8) -> ([u8; 3], [u8; 3]) {
    let lower = [
        sample.h.saturating_sub(picking::HUE_MARGIN),
        sample.s.saturating_sub(picking::SV_MARGIN),
        sample.v.saturating_sub(picking::SV_MARGIN),
    ];
    let upper = [
        sample.h.saturating_add(picking::HUE_MARGIN).min(HUE_MAX),
        255,
        255,
    ];
    (lower, upper)
}
