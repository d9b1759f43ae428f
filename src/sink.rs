//! Persistence sink and detection response payload
//!
//! Annotated frames land under `<root>/<profile subfolder>/` with a
//! timestamped name, JPEG-encoded. The [`DetectionReport`] is the response
//! payload of the external "detect" command surface: success with detection,
//! success without detection and failure are all explicit fields, never an
//! ambiguous empty output.

use std::path::{Path, PathBuf};

use chrono::Local;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::config::ColorProfile;
use crate::error::Result;

/// Writes annotated frames to deterministic per-profile paths
#[derive(Debug, Clone)]
pub struct ImageSink {
    root: PathBuf,
}

impl ImageSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an annotated frame for a profile, returning the written path.
    ///
    /// Creates `<root>/<subfolder>/` on demand; the file name is
    /// `<profile>_<YYYYmmdd_HHMMSS>.jpg`.
    pub fn save(&self, frame: &RgbImage, profile: &ColorProfile) -> Result<PathBuf> {
        let dir = self.root.join(&profile.output_subfolder);
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{}.jpg", profile.name, timestamp));
        frame.save(&path)?;
        log::info!("saved annotated frame to {}", path.display());
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Response payload for one detection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Whether the request itself succeeded (frame acquired, profile known)
    pub success: bool,
    /// Human-readable status
    pub message: String,
    /// Whether an object was detected; meaningful only when `success`
    pub object_detected: bool,
    /// Detected center X in pixels, 0 when nothing was detected
    #[serde(default)]
    pub center_x: i32,
    /// Detected center Y in pixels, 0 when nothing was detected
    #[serde(default)]
    pub center_y: i32,
    /// Where the annotated frame was saved, empty when nothing was detected
    #[serde(default)]
    pub saved_path: String,
}

impl DetectionReport {
    /// Successful request that localized an object
    pub fn found(profile: &str, center: (f32, f32), saved_path: &Path) -> Self {
        Self {
            success: true,
            message: format!("detected {profile}"),
            object_detected: true,
            center_x: center.0.round() as i32,
            center_y: center.1.round() as i32,
            saved_path: saved_path.display().to_string(),
        }
    }

    /// Successful request that found nothing above the noise threshold
    pub fn not_found(profile: &str) -> Self {
        Self {
            success: true,
            message: format!("no {profile} object detected"),
            object_detected: false,
            center_x: 0,
            center_y: 0,
            saved_path: String::new(),
        }
    }

    /// Failed request (frame or profile error)
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            object_detected: false,
            center_x: 0,
            center_y: 0,
            saved_path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HsvRange;

    fn profile() -> ColorProfile {
        ColorProfile {
            name: "yellow".into(),
            range: HsvRange::Single {
                lower: [20, 80, 80],
                upper: [40, 255, 255],
            },
            draw_color: [0, 255, 255],
            output_subfolder: "yellow".into(),
        }
    }

    #[test]
    fn save_writes_under_profile_subfolder() {
        let dir = std::env::temp_dir().join(format!("color_gauge_sink_{}", std::process::id()));
        let sink = ImageSink::new(&dir);
        let frame = RgbImage::from_pixel(16, 16, image::Rgb([128, 64, 32]));

        let path = sink.save(&frame, &profile()).unwrap();
        assert!(path.starts_with(dir.join("yellow")));
        assert!(path.extension().is_some_and(|e| e == "jpg"));
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn report_variants_are_distinguishable() {
        let found = DetectionReport::found("yellow", (320.4, 239.6), Path::new("out/a.jpg"));
        assert!(found.success && found.object_detected);
        assert_eq!((found.center_x, found.center_y), (320, 240));

        let none = DetectionReport::not_found("yellow");
        assert!(none.success && !none.object_detected);
        assert!(none.saved_path.is_empty());

        let fail = DetectionReport::failure("no frame");
        assert!(!fail.success && !fail.object_detected);
    }

    #[test]
    fn report_serializes_to_stable_json_shape() {
        let report = DetectionReport::not_found("red");
        let json = serde_json::to_string(&report).unwrap();
        for key in [
            "success",
            "message",
            "object_detected",
            "center_x",
            "center_y",
            "saved_path",
        ] {
            assert!(json.contains(key), "missing key {key}");
        }
        let back: DetectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
