//! Geographic and screen-space coordinate pairs.

use geo::Coord;

use crate::config::MAX_COORDINATE_PRECISION;

/// A WGS84 position in degrees.
///
/// Input range is not restricted; whether a position is meaningful depends on
/// the engine and the current viewport.
///
/// # Examples
///
/// ```
/// use mapbridge_core::LngLat;
///
/// let position = LngLat::new(-122.084_252_077, 37.422_592_266).limit_precision(3);
/// assert_eq!(position, LngLat::new(-122.084, 37.423));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Create a position from longitude and latitude.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Round both axes to `digits` decimal places.
    ///
    /// Precision is capped at [`MAX_COORDINATE_PRECISION`]; beyond that an
    /// `f64` cannot represent the extra digits anyway.
    #[must_use]
    pub fn limit_precision(self, digits: u32) -> Self {
        let exponent = i32::try_from(digits.min(MAX_COORDINATE_PRECISION)).unwrap_or(0);
        let factor = 10_f64.powi(exponent);
        Self {
            lng: (self.lng * factor).round() / factor,
            lat: (self.lat * factor).round() / factor,
        }
    }
}

impl From<LngLat> for Coord<f64> {
    fn from(value: LngLat) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl From<Coord<f64>> for LngLat {
    fn from(value: Coord<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// A position in pixels relative to the map container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelPoint {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl PixelPoint {
    /// Create a pixel position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LngLat::new(-122.0, 37.0))]
    #[case(2, LngLat::new(-122.08, 37.42))]
    #[case(9, LngLat::new(-122.084_252_077, 37.422_592_266))]
    fn limits_precision(#[case] digits: u32, #[case] expected: LngLat) {
        let position = LngLat::new(-122.084_252_077, 37.422_592_266);
        assert_eq!(position.limit_precision(digits), expected);
    }

    #[rstest]
    fn converts_to_and_from_geo_coords() {
        let position = LngLat::new(2.5, -4.0);
        let coord: Coord<f64> = position.into();
        assert_eq!(coord, Coord { x: 2.5, y: -4.0 });
        assert_eq!(LngLat::from(coord), position);
    }

    #[rstest]
    fn measures_pixel_distance() {
        let origin = PixelPoint::new(0.0, 0.0);
        assert!((origin.distance_to(PixelPoint::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }
}
