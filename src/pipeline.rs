//! Detection pipeline orchestration
//!
//! One synchronous pass per invocation:
//! segment -> select -> measure -> annotate. No intermediate state is
//! observable and nothing here blocks or performs I/O; the caller owns
//! retries, deadlines and persistence. "Nothing detected" is a normal
//! terminal outcome, not an error.

use image::RgbImage;

use crate::annotate::Annotator;
use crate::config::ProfileStore;
use crate::error::Result;
use crate::measure::{Measurer, OrientedMeasurement};
use crate::region::RegionSelector;
use crate::segment::Segmenter;

/// Terminal result of one detection run
#[derive(Debug, Clone)]
pub enum DetectionOutcome {
    /// A region above the noise threshold was found and measured
    Found {
        measurement: OrientedMeasurement,
        annotated: RgbImage,
    },
    /// No region met the area threshold
    NotFound,
}

impl DetectionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, DetectionOutcome::Found { .. })
    }
}

/// The full color localization and measurement pipeline.
///
/// Stateless per invocation: each call is pure given the frame, the profile
/// and the calibration scale, so concurrent calls on different frames need
/// no synchronization.
#[derive(Debug, Clone, Default)]
pub struct DetectionPipeline {
    segmenter: Segmenter,
    selector: RegionSelector,
    measurer: Measurer,
    annotator: Annotator,
}

impl DetectionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one detection for a named profile.
    ///
    /// Fails only for an unknown profile; an empty mask or an under-sized
    /// region is reported as `NotFound`.
    pub fn detect(
        &self,
        frame: &RgbImage,
        profile_name: &str,
        store: &ProfileStore,
    ) -> Result<DetectionOutcome> {
        let profile = store.resolve(profile_name)?;
        let scale = store.scale();

        log::debug!(
            "detect '{}' on {}x{} frame, scale {} px/unit",
            profile.name,
            frame.width(),
            frame.height(),
            scale
        );

        let mask = self.segmenter.segment(frame, &profile);
        let Some(region) = self.selector.select_largest(&mask) else {
            log::info!("'{}': no region found", profile.name);
            return Ok(DetectionOutcome::NotFound);
        };

        let measurement = self.measurer.measure(&region, scale);
        log::info!(
            "'{}': region area {:.0} px^2, {:.1} x {:.1} units at ({:.1}, {:.1})",
            profile.name,
            region.area,
            measurement.major_units,
            measurement.minor_units,
            measurement.center.0,
            measurement.center.1
        );

        let annotated = self.annotator.annotate(frame, &measurement, &profile);
        Ok(DetectionOutcome::Found {
            measurement,
            annotated,
        })
    }
}

/// Convenience wrapper running a default-configured [`DetectionPipeline`]
pub fn detect(
    frame: &RgbImage,
    profile_name: &str,
    store: &ProfileStore,
) -> Result<DetectionOutcome> {
    DetectionPipeline::new().detect(frame, profile_name, store)
}
