//! Fixed parameters of the detection pipeline
//!
//! Values here were carried over from the calibrated production setup;
//! changing them invalidates existing threshold profiles and scale data.

/// Segmentation parameters
pub mod segmentation {
    /// Radius of the square structuring element used for the opening pass.
    /// Radius 2 corresponds to the 5x5 all-ones kernel of the original rig.
    pub const OPENING_RADIUS: u8 = 2;

    /// Upper bound of the hue channel. Hue lives in [0, 180] so that a full
    /// revolution fits in one byte at half-degree-pair resolution; existing
    /// profile data is authored against this domain.
    pub const HUE_MAX: u8 = 180;
}

/// Region selection parameters
pub mod selection {
    /// Regions with contour area less than or equal to this many square
    /// pixels are treated as noise. The filter is strictly greater-than.
    pub const MIN_REGION_AREA: f64 = 1500.0;
}

/// Measurement parameters
pub mod measurement {
    /// An edge is labelled as the major or minor dimension when its length
    /// is within this many pixels of that dimension.
    pub const EDGE_DIM_TOLERANCE_PX: f32 = 10.0;
}

/// Annotation layout parameters
pub mod annotation {
    /// Distance in pixels a dimension label is pushed outward from the box
    /// center along the center-to-edge-midpoint direction.
    pub const LABEL_OFFSET_PX: f32 = 35.0;

    /// Pixel height of dimension label text
    pub const LABEL_TEXT_SCALE: f32 = 22.0;

    /// Pixel height of the profile name caption
    pub const NAME_TEXT_SCALE: f32 = 26.0;

    /// Vertical gap between the topmost box corner and the profile name
    pub const NAME_OFFSET_PX: i32 = 28;

    /// Half-length of the center cross marker arms
    pub const CROSS_HALF_LEN: f32 = 8.0;
}

/// Threshold window margins used by the click-to-pick helper
pub mod picking {
    /// Hue window half-width around the sampled pixel
    pub const HUE_MARGIN: u8 = 10;

    /// Lower-bound slack on saturation and value around the sampled pixel
    pub const SV_MARGIN: u8 = 60;
}
