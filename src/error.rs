//! Error types for the color_gauge library

use thiserror::Error;

/// Result type alias for color_gauge operations
pub type Result<T> = std::result::Result<T, GaugeError>;

/// Error types for profile resolution, calibration and detection runs
#[derive(Error, Debug)]
pub enum GaugeError {
    /// Requested color profile is absent from the store
    #[error("Unknown color profile: {name}")]
    UnknownProfile { name: String },

    /// A profile record failed validation at load time
    #[error("Invalid color profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    /// A non-positive calibration scale was rejected; the previous value is retained
    #[error("Invalid calibration scale: {value} (must be positive)")]
    InvalidScale { value: f32 },

    /// Upstream frame acquisition failed (timeout or hardware fault)
    #[error("No frame available: {reason}")]
    NoFrame { reason: String },

    /// Configuration document could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image decode/encode failure in the persistence boundary
    #[error("Image codec error")]
    ImageError(#[from] image::ImageError),

    /// Filesystem failure in the persistence boundary
    #[error("I/O error")]
    IoError(#[from] std::io::Error),
}

impl GaugeError {
    /// Create a configuration error with an underlying cause
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error without an underlying cause
    pub fn config_msg(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// Frame acquisition faults are transient; profile and scale errors
    /// require an operator fix first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GaugeError::NoFrame { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_message_names_the_profile() {
        let err = GaugeError::UnknownProfile {
            name: "magenta".into(),
        };
        assert!(err.to_string().contains("magenta"));
    }

    #[test]
    fn only_frame_faults_are_retryable() {
        assert!(GaugeError::NoFrame {
            reason: "timeout".into()
        }
        .is_retryable());
        assert!(!GaugeError::InvalidScale { value: -1.0 }.is_retryable());
        assert!(!GaugeError::UnknownProfile { name: "x".into() }.is_retryable());
    }
}
