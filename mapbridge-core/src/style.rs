//! Style descriptors and the resolver callers use to produce them.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::Feature;

/// Rendering style for a single feature.
///
/// Each engine binding translates this into its native style objects. Only
/// the fields relevant to the feature's geometry kind are consulted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatureStyle {
    /// Point fill color as a CSS hex string.
    pub point_color: String,
    /// Point radius in pixels.
    pub point_width: f64,
    /// Point outline color.
    pub point_outline_color: String,
    /// Point outline width in pixels.
    pub point_outline_width: f64,
    /// Polygon fill color.
    pub polygon_fill_color: String,
    /// Polygon fill opacity in `[0, 1]`.
    pub polygon_fill_opacity: f64,
    /// Polygon outline color.
    pub polygon_outline_color: String,
    /// Polygon outline width in pixels.
    pub polygon_outline_width: f64,
    /// Line string color.
    pub line_string_color: String,
    /// Line string width in pixels.
    pub line_string_width: f64,
    /// Stacking order; higher values draw on top.
    pub z_index: i32,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            point_color: "#3f97e0".to_owned(),
            point_width: 6.0,
            point_outline_color: "#ffffff".to_owned(),
            point_outline_width: 0.0,
            polygon_fill_color: "#3f97e0".to_owned(),
            polygon_fill_opacity: 0.3,
            polygon_outline_color: "#3f97e0".to_owned(),
            polygon_outline_width: 4.0,
            line_string_color: "#3f97e0".to_owned(),
            line_string_width: 4.0,
            z_index: 0,
        }
    }
}

/// Maps a feature to its style.
///
/// Adapters call this once per feature they draw and never look inside the
/// resolver. Returning `None` hides the feature. Closures of the right shape
/// implement the trait.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use geo::{Geometry, Point};
/// use mapbridge_core::{Feature, FeatureStyle, SharedStyleResolver};
///
/// let resolver: SharedStyleResolver = Rc::new(|_: &Feature| Some(FeatureStyle::default()));
/// let feature = Feature::new("a", Geometry::Point(Point::new(0.0, 0.0)));
/// assert!(resolver.resolve(&feature).is_some());
/// ```
pub trait StyleResolver {
    /// Style for `feature`, or `None` to leave it undrawn.
    fn resolve(&self, feature: &Feature) -> Option<FeatureStyle>;
}

impl<F> StyleResolver for F
where
    F: Fn(&Feature) -> Option<FeatureStyle>,
{
    fn resolve(&self, feature: &Feature) -> Option<FeatureStyle> {
        self(feature)
    }
}

/// Reference-counted resolver; native style callbacks keep it alive after
/// `render` returns.
pub type SharedStyleResolver = Rc<dyn StyleResolver>;

type ModeStyleFn = Box<dyn Fn(&Feature) -> FeatureStyle>;

/// Resolver that dispatches on the feature's `mode` property.
///
/// Features whose mode has no entry, or that carry no mode at all, resolve
/// to `None`.
#[derive(Default)]
pub struct ModeStyles {
    modes: HashMap<String, ModeStyleFn>,
}

impl ModeStyles {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the style function for `mode`.
    #[must_use]
    pub fn with_mode<F>(mut self, mode: impl Into<String>, style: F) -> Self
    where
        F: Fn(&Feature) -> FeatureStyle + 'static,
    {
        self.modes.insert(mode.into(), Box::new(style));
        self
    }
}

impl fmt::Debug for ModeStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modes: Vec<_> = self.modes.keys().collect();
        modes.sort();
        f.debug_struct("ModeStyles").field("modes", &modes).finish()
    }
}

impl StyleResolver for ModeStyles {
    fn resolve(&self, feature: &Feature) -> Option<FeatureStyle> {
        let style = self.modes.get(feature.mode()?)?;
        Some(style(feature))
    }
}
