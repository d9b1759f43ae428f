//! Binary mask production from a frame and a color profile
//!
//! Converts the frame to quantized HSV, applies the profile's inclusive
//! threshold window(s) and runs one morphological opening pass to knock out
//! speckle noise. Always yields a mask, possibly all-zero.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::open;

use crate::color::rgb_to_hsv8;
use crate::config::ColorProfile;
use crate::constants::segmentation::OPENING_RADIUS;

/// HSV threshold segmenter with a fixed denoising pass
#[derive(Debug, Clone)]
pub struct Segmenter {
    opening_radius: u8,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Segmenter with the production 5x5 opening kernel
    pub fn new() -> Self {
        Self {
            opening_radius: OPENING_RADIUS,
        }
    }

    /// Override the opening radius (0 disables the denoising pass)
    pub fn with_opening_radius(radius: u8) -> Self {
        Self {
            opening_radius: radius,
        }
    }

    /// Produce the binary mask for one profile.
    ///
    /// Foreground is 255. Dual-range profiles OR their two windows at the
    /// pixel level, which is how hue wrap-around stays a single mask.
    pub fn segment(&self, frame: &RgbImage, profile: &ColorProfile) -> GrayImage {
        let mut mask = GrayImage::new(frame.width(), frame.height());
        for (x, y, px) in frame.enumerate_pixels() {
            if profile.range.contains(rgb_to_hsv8(*px)) {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }

        if self.opening_radius > 0 {
            // Erosion then dilation with an L-inf ball, i.e. the square
            // all-ones structuring element of side 2r + 1.
            mask = open(&mask, Norm::LInf, self.opening_radius);
        }
        mask
    }
}
