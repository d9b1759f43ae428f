//! Color profile store and calibration scale
//!
//! Profiles are authored externally (tuning GUI) and loaded wholesale from
//! the legacy YAML document:
//!
//! ```yaml
//! colors:
//!   yellow:
//!     lower: [20, 80, 80]
//!     upper: [40, 255, 255]
//!     draw_color: [0, 255, 255]   # B, G, R
//!     save_dir: yellow
//!   red:
//!     lower1: [0, 43, 46]
//!     upper1: [10, 255, 255]
//!     lower2: [156, 43, 46]
//!     upper2: [180, 255, 255]
//! system:
//!   pixels_per_mm: 10.5
//!   save_root: saved_images
//! ```
//!
//! The optional `lower`/`lower1`/`lower2` record shape is resolved once at
//! load time into the tagged [`HsvRange`] variant; the pipeline never
//! branches on key presence.
//!
//! The store is read-mostly: every detection run takes an [`Arc`] snapshot,
//! and the only runtime mutation is the calibration scale, which swaps in a
//! fresh snapshot under a short write lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::color::Hsv8;
use crate::constants::segmentation::HUE_MAX;
use crate::error::{GaugeError, Result};

/// One or two inclusive HSV threshold windows.
///
/// Two windows express a hue wrap-around (red straddles 0/180); their masks
/// are combined with logical OR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HsvRange {
    Single {
        lower: [u8; 3],
        upper: [u8; 3],
    },
    Dual {
        lower1: [u8; 3],
        upper1: [u8; 3],
        lower2: [u8; 3],
        upper2: [u8; 3],
    },
}

impl HsvRange {
    /// Inclusive membership test; dual windows are a union
    pub fn contains(&self, px: Hsv8) -> bool {
        match *self {
            HsvRange::Single { lower, upper } => px.in_range(lower, upper),
            HsvRange::Dual {
                lower1,
                upper1,
                lower2,
                upper2,
            } => px.in_range(lower1, upper1) || px.in_range(lower2, upper2),
        }
    }

    fn check_hue_bounds(&self) -> std::result::Result<(), String> {
        let bounds = match *self {
            HsvRange::Single { lower, upper } => vec![lower[0], upper[0]],
            HsvRange::Dual {
                lower1,
                upper1,
                lower2,
                upper2,
            } => vec![lower1[0], upper1[0], lower2[0], upper2[0]],
        };
        match bounds.iter().find(|&&h| h > HUE_MAX) {
            Some(h) => Err(format!("hue bound {h} exceeds {HUE_MAX}")),
            None => Ok(()),
        }
    }
}

/// A named HSV threshold definition with its drawing and output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    pub name: String,
    pub range: HsvRange,
    /// Annotation color as a B, G, R triple (legacy channel order)
    pub draw_color: [u8; 3],
    /// Subfolder of the output root that annotated frames land in
    pub output_subfolder: String,
}

impl ColorProfile {
    /// Annotation color in RGB channel order
    pub fn draw_color_rgb(&self) -> image::Rgb<u8> {
        let [b, g, r] = self.draw_color;
        image::Rgb([r, g, b])
    }
}

/// Immutable view of the store contents taken at the start of a run
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub profiles: BTreeMap<String, ColorProfile>,
    /// Calibrated pixels-per-unit scale; 1.0 means no physical conversion
    pub pixels_per_unit: f32,
    /// Root directory annotated frames are persisted under
    pub output_root: PathBuf,
}

/// Shared handle to the profile set and calibration scale.
///
/// Readers take cheap copy-on-write snapshots; `set_scale` is the only
/// runtime mutation. Threshold edits are authored externally and loaded
/// wholesale via [`ProfileStore::from_yaml_str`].
#[derive(Debug)]
pub struct ProfileStore {
    state: RwLock<Arc<StoreSnapshot>>,
}

impl ProfileStore {
    /// Build a store from already-validated profiles.
    ///
    /// A non-positive or non-finite scale falls back to 1.0 (pixel units).
    pub fn new(
        profiles: BTreeMap<String, ColorProfile>,
        pixels_per_unit: f32,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        let scale = if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 {
            pixels_per_unit
        } else {
            log::warn!("non-positive calibration scale {pixels_per_unit}, using 1.0");
            1.0
        };
        Self {
            state: RwLock::new(Arc::new(StoreSnapshot {
                profiles,
                pixels_per_unit: scale,
                output_root: output_root.into(),
            })),
        }
    }

    /// Parse the legacy YAML configuration document
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let doc: RawDocument = serde_yaml::from_str(text)
            .map_err(|e| GaugeError::config("failed to parse configuration document", e))?;

        let mut profiles = BTreeMap::new();
        for (name, raw) in doc.colors {
            let profile = raw.into_profile(&name)?;
            profiles.insert(name, profile);
        }

        let scale = doc.system.pixels_per_mm.unwrap_or(1.0);
        let root = doc
            .system
            .save_root
            .unwrap_or_else(|| PathBuf::from("saved_images"));
        Ok(Self::new(profiles, scale, root))
    }

    /// Load the configuration document from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize back to the legacy YAML document shape
    pub fn to_yaml_string(&self) -> Result<String> {
        let snap = self.snapshot();
        let doc = RawDocument {
            colors: snap
                .profiles
                .iter()
                .map(|(name, p)| (name.clone(), RawProfile::from_profile(p)))
                .collect(),
            system: RawSystem {
                pixels_per_mm: Some(snap.pixels_per_unit),
                save_root: Some(snap.output_root.clone()),
            },
        };
        serde_yaml::to_string(&doc)
            .map_err(|e| GaugeError::config("failed to serialize configuration document", e))
    }

    /// Write the configuration document to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Copy-on-write snapshot for one detection run
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.state.read().expect("profile store lock poisoned"))
    }

    /// Look up a profile by name
    pub fn resolve(&self, name: &str) -> Result<ColorProfile> {
        self.snapshot()
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| GaugeError::UnknownProfile { name: name.into() })
    }

    /// Names of all loaded profiles, in stable order
    pub fn profile_names(&self) -> Vec<String> {
        self.snapshot().profiles.keys().cloned().collect()
    }

    /// Current pixels-per-unit calibration scale
    pub fn scale(&self) -> f32 {
        self.snapshot().pixels_per_unit
    }

    /// Replace the calibration scale.
    ///
    /// Rejects non-positive values with `InvalidScale`; the previous scale
    /// stays in effect.
    pub fn set_scale(&self, value: f32) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(GaugeError::InvalidScale { value });
        }
        let mut guard = self.state.write().expect("profile store lock poisoned");
        let mut next = (**guard).clone();
        next.pixels_per_unit = value;
        *guard = Arc::new(next);
        Ok(())
    }
}

// Raw document structs mirror the on-disk shape, optional keys included.
// Conversion into the tagged types happens exactly once, here.

#[derive(Debug, Serialize, Deserialize)]
struct RawDocument {
    #[serde(default)]
    colors: BTreeMap<String, RawProfile>,
    #[serde(default)]
    system: RawSystem,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawSystem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pixels_per_mm: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_root: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower1: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper1: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower2: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper2: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    draw_color: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_dir: Option<String>,
}

impl RawProfile {
    fn into_profile(self, name: &str) -> Result<ColorProfile> {
        let invalid = |reason: &str| GaugeError::InvalidProfile {
            name: name.into(),
            reason: reason.into(),
        };

        let range = match (self.lower, self.upper, self.lower1, self.upper1, self.lower2, self.upper2)
        {
            (Some(lower), Some(upper), None, None, None, None) => {
                HsvRange::Single { lower, upper }
            }
            (None, None, Some(lower1), Some(upper1), Some(lower2), Some(upper2)) => {
                HsvRange::Dual {
                    lower1,
                    upper1,
                    lower2,
                    upper2,
                }
            }
            (None, None, None, None, None, None) => {
                return Err(invalid("no threshold range defined"))
            }
            _ => return Err(invalid("expected either lower/upper or lower1/upper1 + lower2/upper2")),
        };

        range
            .check_hue_bounds()
            .map_err(|reason| invalid(&reason))?;

        Ok(ColorProfile {
            name: name.into(),
            range,
            // BGR green, matching the legacy drawing default
            draw_color: self.draw_color.unwrap_or([0, 255, 0]),
            output_subfolder: self.save_dir.unwrap_or_else(|| name.into()),
        })
    }

    fn from_profile(profile: &ColorProfile) -> Self {
        let mut raw = RawProfile {
            draw_color: Some(profile.draw_color),
            save_dir: Some(profile.output_subfolder.clone()),
            ..RawProfile::default()
        };
        match profile.range {
            HsvRange::Single { lower, upper } => {
                raw.lower = Some(lower);
                raw.upper = Some(upper);
            }
            HsvRange::Dual {
                lower1,
                upper1,
                lower2,
                upper2,
            } => {
                raw.lower1 = Some(lower1);
                raw.upper1 = Some(upper1);
                raw.lower2 = Some(lower2);
                raw.upper2 = Some(upper2);
            }
        }
        raw
    }
}
