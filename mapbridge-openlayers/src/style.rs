//! Translation from [`FeatureStyle`] to `ol/style` objects.

use mapbridge_core::{FeatureStyle, GeometryKind};

/// `ol/style/Fill`.
#[derive(Debug, Clone, PartialEq)]
pub struct OlFill {
    /// CSS color.
    pub color: String,
}

/// `ol/style/Stroke`.
#[derive(Debug, Clone, PartialEq)]
pub struct OlStroke {
    /// CSS color.
    pub color: String,
    /// Width in pixels.
    pub width: f64,
}

/// `ol/style/Circle`, the marker drawn for points.
#[derive(Debug, Clone, PartialEq)]
pub struct OlCircle {
    /// Radius in pixels.
    pub radius: f64,
    /// Interior.
    pub fill: OlFill,
    /// Outline.
    pub stroke: OlStroke,
}

/// `ol/style/Style`.
#[derive(Debug, Clone, PartialEq)]
pub struct OlStyle {
    /// Point marker.
    pub image: Option<OlCircle>,
    /// Polygon interior.
    pub fill: Option<OlFill>,
    /// Line or polygon outline.
    pub stroke: Option<OlStroke>,
    /// Stacking order.
    pub z_index: i32,
}

impl OlStyle {
    /// Native style for a feature of `kind` drawn with `style`.
    ///
    /// Returns `None` for geometry collections, which OpenLayers then leaves
    /// undrawn.
    #[must_use]
    pub fn for_feature(kind: Option<GeometryKind>, style: &FeatureStyle) -> Option<Self> {
        let base = Self {
            image: None,
            fill: None,
            stroke: None,
            z_index: style.z_index,
        };
        match kind? {
            GeometryKind::Point => Some(Self {
                image: Some(OlCircle {
                    radius: style.point_width,
                    fill: OlFill {
                        color: style.point_color.clone(),
                    },
                    stroke: OlStroke {
                        color: style.point_outline_color.clone(),
                        width: style.point_outline_width,
                    },
                }),
                ..base
            }),
            GeometryKind::LineString => Some(Self {
                stroke: Some(OlStroke {
                    color: style.line_string_color.clone(),
                    width: style.line_string_width,
                }),
                ..base
            }),
            GeometryKind::Polygon => Some(Self {
                fill: Some(OlFill {
                    color: hex_to_rgba(&style.polygon_fill_color, style.polygon_fill_opacity)
                        .unwrap_or_else(|| style.polygon_fill_color.clone()),
                }),
                stroke: Some(OlStroke {
                    color: style.polygon_outline_color.clone(),
                    width: style.polygon_outline_width,
                }),
                ..base
            }),
        }
    }
}

/// `rgba(...)` for a `#rgb` or `#rrggbb` color at `opacity`.
///
/// OpenLayers fills have no separate opacity, so polygon fill opacity is
/// folded into the color. Returns `None` for anything that is not a hex
/// color.
///
/// # Examples
///
/// ```
/// use mapbridge_openlayers::hex_to_rgba;
///
/// assert_eq!(hex_to_rgba("#3f97e0", 0.3).as_deref(), Some("rgba(63, 151, 224, 0.3)"));
/// assert_eq!(hex_to_rgba("#fff", 1.0).as_deref(), Some("rgba(255, 255, 255, 1)"));
/// assert_eq!(hex_to_rgba("red", 1.0), None);
/// ```
#[must_use]
pub fn hex_to_rgba(hex: &str, opacity: f64) -> Option<String> {
    let digits: Vec<u32> = hex
        .strip_prefix('#')?
        .chars()
        .map(|c| c.to_digit(16))
        .collect::<Option<_>>()?;
    let (red, green, blue) = match digits.as_slice() {
        [r, g, b] => (r * 17, g * 17, b * 17),
        [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2),
        _ => return None,
    };
    Some(format!("rgba({red}, {green}, {blue}, {opacity})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#000000", 0.5, "rgba(0, 0, 0, 0.5)")]
    #[case("#FF8000", 1.0, "rgba(255, 128, 0, 1)")]
    #[case("#0f0", 0.25, "rgba(0, 255, 0, 0.25)")]
    fn converts_hex(#[case] hex: &str, #[case] opacity: f64, #[case] expected: &str) {
        assert_eq!(hex_to_rgba(hex, opacity).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("3f97e0")]
    #[case("#3f97e")]
    #[case("#zzzzzz")]
    #[case("")]
    fn rejects_non_hex(#[case] input: &str) {
        assert_eq!(hex_to_rgba(input, 1.0), None);
    }

    #[rstest]
    fn points_become_circles() {
        let style = FeatureStyle {
            point_width: 8.0,
            point_outline_width: 2.0,
            ..FeatureStyle::default()
        };
        let native =
            OlStyle::for_feature(Some(GeometryKind::Point), &style).expect("points are drawn");
        let circle = native.image.expect("points carry a circle");
        assert!((circle.radius - 8.0).abs() < f64::EPSILON);
        assert_eq!(circle.fill.color, style.point_color);
        assert!((circle.stroke.width - 2.0).abs() < f64::EPSILON);
        assert!(native.fill.is_none());
    }

    #[rstest]
    fn polygon_fill_folds_in_opacity() {
        let native = OlStyle::for_feature(Some(GeometryKind::Polygon), &FeatureStyle::default())
            .expect("polygons are drawn");
        assert_eq!(
            native.fill.map(|fill| fill.color).as_deref(),
            Some("rgba(63, 151, 224, 0.3)")
        );
        assert!(native.stroke.is_some());
        assert!(native.image.is_none());
    }

    #[rstest]
    fn named_fill_colors_pass_through() {
        let style = FeatureStyle {
            polygon_fill_color: "teal".to_owned(),
            ..FeatureStyle::default()
        };
        let native =
            OlStyle::for_feature(Some(GeometryKind::Polygon), &style).expect("polygons are drawn");
        assert_eq!(native.fill.map(|fill| fill.color).as_deref(), Some("teal"));
    }

    #[rstest]
    fn lines_only_stroke() {
        let native =
            OlStyle::for_feature(Some(GeometryKind::LineString), &FeatureStyle::default())
                .expect("lines are drawn");
        assert_eq!(native.stroke.map(|stroke| stroke.width), Some(4.0));
        assert!(native.fill.is_none());
    }

    #[rstest]
    fn collections_are_undrawn() {
        assert_eq!(OlStyle::for_feature(None, &FeatureStyle::default()), None);
    }
}
