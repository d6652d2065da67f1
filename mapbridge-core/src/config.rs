//! Adapter configuration shared by every engine binding.

use thiserror::Error;

/// Highest number of decimal places an adapter will keep on coordinates.
pub const MAX_COORDINATE_PRECISION: u32 = 15;

/// Default number of decimal places kept on pointer coordinates.
const DEFAULT_COORDINATE_PRECISION: u32 = 9;

/// Default distance a pointer must travel while pressed before it counts as a
/// drag rather than a click.
const DEFAULT_MIN_PIXEL_DRAG_DISTANCE: f64 = 1.0;

/// Tunables for pointer normalisation.
///
/// # Examples
///
/// ```
/// use mapbridge_core::AdapterConfig;
///
/// let config = AdapterConfig::default()
///     .with_coordinate_precision(6)
///     .with_min_pixel_drag_distance(8.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.coordinate_precision, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdapterConfig {
    /// Decimal places kept on the longitude and latitude of pointer events.
    pub coordinate_precision: u32,
    /// Pixels a pressed pointer must move before a drag starts.
    pub min_pixel_drag_distance: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
            min_pixel_drag_distance: DEFAULT_MIN_PIXEL_DRAG_DISTANCE,
        }
    }
}

impl AdapterConfig {
    /// Set the number of decimal places kept on pointer coordinates.
    #[must_use]
    pub const fn with_coordinate_precision(mut self, digits: u32) -> Self {
        self.coordinate_precision = digits;
        self
    }

    /// Set the drag threshold in pixels.
    #[must_use]
    pub const fn with_min_pixel_drag_distance(mut self, pixels: f64) -> Self {
        self.min_pixel_drag_distance = pixels;
        self
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the precision exceeds
    /// [`MAX_COORDINATE_PRECISION`] or the drag distance is negative or not
    /// finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(ConfigError::PrecisionOutOfRange {
                digits: self.coordinate_precision,
            });
        }
        if !self.min_pixel_drag_distance.is_finite() || self.min_pixel_drag_distance < 0.0 {
            return Err(ConfigError::InvalidDragDistance {
                pixels: self.min_pixel_drag_distance,
            });
        }
        Ok(())
    }
}

/// Errors returned by [`AdapterConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// More decimal places were requested than an `f64` can carry.
    #[error("coordinate precision {digits} exceeds the maximum of {MAX_COORDINATE_PRECISION}")]
    PrecisionOutOfRange {
        /// Requested number of decimal places.
        digits: u32,
    },
    /// The drag threshold was negative, NaN or infinite.
    #[error("minimum drag distance must be a finite, non-negative number, got {pixels}")]
    InvalidDragDistance {
        /// Rejected threshold.
        pixels: f64,
    },
}
