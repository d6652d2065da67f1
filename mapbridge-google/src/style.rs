//! Translation from [`FeatureStyle`] to `google.maps.Data.StyleOptions`.

use mapbridge_core::{FeatureStyle, GeometryKind};

/// `google.maps.Symbol` using the `CIRCLE` path.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleIcon {
    /// Circle radius in pixels.
    pub scale: f64,
    /// Fill color.
    pub fill_color: String,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Outline color.
    pub stroke_color: String,
    /// Outline width.
    pub stroke_weight: f64,
}

/// `google.maps.Data.StyleOptions`, limited to the fields the adapter sets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStyle {
    /// Whether the feature is drawn at all.
    pub visible: bool,
    /// Stacking order.
    pub z_index: i32,
    /// Polygon fill color.
    pub fill_color: Option<String>,
    /// Polygon fill opacity.
    pub fill_opacity: Option<f64>,
    /// Line or polygon outline color.
    pub stroke_color: Option<String>,
    /// Line or polygon outline width.
    pub stroke_weight: Option<f64>,
    /// Marker symbol for points.
    pub icon: Option<CircleIcon>,
}

impl DataStyle {
    /// A style that hides the feature.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            visible: false,
            z_index: 0,
            fill_color: None,
            fill_opacity: None,
            stroke_color: None,
            stroke_weight: None,
            icon: None,
        }
    }

    /// Native style for a feature of `kind` drawn with `style`.
    ///
    /// Geometry collections have no single kind and are hidden.
    #[must_use]
    pub fn for_feature(kind: Option<GeometryKind>, style: &FeatureStyle) -> Self {
        let visible = Self {
            visible: true,
            z_index: style.z_index,
            ..Self::hidden()
        };
        match kind {
            Some(GeometryKind::Point) => Self {
                icon: Some(CircleIcon {
                    scale: style.point_width,
                    fill_color: style.point_color.clone(),
                    fill_opacity: 1.0,
                    stroke_color: style.point_outline_color.clone(),
                    stroke_weight: style.point_outline_width,
                }),
                ..visible
            },
            Some(GeometryKind::LineString) => Self {
                stroke_color: Some(style.line_string_color.clone()),
                stroke_weight: Some(style.line_string_width),
                ..visible
            },
            Some(GeometryKind::Polygon) => Self {
                fill_color: Some(style.polygon_fill_color.clone()),
                fill_opacity: Some(style.polygon_fill_opacity),
                stroke_color: Some(style.polygon_outline_color.clone()),
                stroke_weight: Some(style.polygon_outline_width),
                ..visible
            },
            None => Self::hidden(),
        }
    }
}
