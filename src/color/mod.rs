//! Color space handling for HSV thresholding
//!
//! - RGB to byte-quantized HSV conversion
//! - Threshold window derivation from a sampled pixel

pub mod hsv;

pub use hsv::{pick_window, rgb_to_hsv8, Hsv8};
