//! Frame acquisition boundary
//!
//! The camera SDK lives outside this crate; the pipeline only needs
//! something that hands over one RGB frame per request. Acquisition
//! failures surface as `NoFrame` so callers can retry without conflating
//! them with detection results.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{GaugeError, Result};

/// Anything that can supply one frame per request
pub trait FrameSource {
    /// Grab the next frame, or fail with `NoFrame` on timeout or fault
    fn grab(&mut self) -> Result<RgbImage>;
}

/// Frame source backed by a still image file, used by the CLI and tests as
/// a stand-in for the camera
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileFrameSource {
    fn grab(&mut self) -> Result<RgbImage> {
        let img = image::open(&self.path).map_err(|e| GaugeError::NoFrame {
            reason: format!("could not read {}: {e}", self.path.display()),
        })?;
        Ok(img.to_rgb8())
    }
}
