//! # color-gauge
//!
//! Color-based object localization and measurement for industrial camera
//! frames.
//!
//! Given a raw RGB frame and a named color profile, the pipeline:
//! - segments pixels inside the profile's HSV threshold window(s)
//! - isolates the dominant connected region
//! - fits the minimum-area oriented rectangle and converts pixel
//!   dimensions to physical units via a calibrated scale
//! - renders an annotated copy of the frame
//!
//! Camera acquisition, GUIs and network transport stay outside the crate;
//! the pipeline consumes and produces plain in-memory values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use color_gauge::{detect, DetectionOutcome, ProfileStore};
//! use std::path::Path;
//!
//! let store = ProfileStore::load(Path::new("config.yaml"))?;
//! let frame = image::open("frame.png")?.to_rgb8();
//!
//! match detect(&frame, "yellow", &store)? {
//!     DetectionOutcome::Found { measurement, .. } => {
//!         println!(
//!             "{:.1} x {:.1} units at ({:.0}, {:.0})",
//!             measurement.major_units,
//!             measurement.minor_units,
//!             measurement.center.0,
//!             measurement.center.1,
//!         );
//!     }
//!     DetectionOutcome::NotFound => println!("nothing there"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotate;
pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod measure;
pub mod pipeline;
pub mod region;
pub mod segment;
pub mod sink;
pub mod source;

pub use annotate::Annotator;
pub use config::{ColorProfile, HsvRange, ProfileStore, StoreSnapshot};
pub use error::{GaugeError, Result};
pub use measure::{DimensionKind, EdgeInfo, EdgeLabel, Measurer, OrientedMeasurement};
pub use pipeline::{detect, DetectionOutcome, DetectionPipeline};
pub use region::{Region, RegionSelector};
pub use segment::Segmenter;
pub use sink::{DetectionReport, ImageSink};
pub use source::{FileFrameSource, FrameSource};
