//! Features and the change-sets that describe how they evolve between renders.

use std::collections::HashMap;
use std::fmt;

use geo::Geometry;
use serde_json::Value;

/// Property bag carried by a feature.
pub type Properties = serde_json::Map<String, Value>;

/// Unique identifier of a feature within the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeatureId(String);

impl FeatureId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad geometry family used to pick styling rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Points and multi-points.
    Point,
    /// Lines, line strings and multi-line strings.
    LineString,
    /// Polygons, multi-polygons, rectangles and triangles.
    Polygon,
}

impl GeometryKind {
    /// Classify `geometry`; collections have no single kind.
    #[must_use]
    pub fn of(geometry: &Geometry<f64>) -> Option<Self> {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(Self::Point),
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                Some(Self::LineString)
            }
            Geometry::Polygon(_)
            | Geometry::MultiPolygon(_)
            | Geometry::Rect(_)
            | Geometry::Triangle(_) => Some(Self::Polygon),
            Geometry::GeometryCollection(_) => None,
        }
    }
}

/// A GeoJSON-shaped feature owned by the store.
///
/// Geometry uses `x = longitude`, `y = latitude`.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, Point};
/// use mapbridge_core::Feature;
///
/// let feature = Feature::new("point-1", Geometry::Point(Point::new(1.0, 2.0)))
///     .with_property("mode", "point");
/// assert_eq!(feature.mode(), Some("point"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Store identifier.
    pub id: FeatureId,
    /// Geometry in WGS84 degrees.
    pub geometry: Geometry<f64>,
    /// Arbitrary properties.
    pub properties: Properties,
}

impl Feature {
    /// Create a feature with no properties.
    #[must_use]
    pub fn new(id: impl Into<FeatureId>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
            properties: Properties::new(),
        }
    }

    /// Add or replace a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The drawing mode that owns this feature, read from the `mode`
    /// property.
    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        self.properties.get("mode").and_then(Value::as_str)
    }

    /// Geometry family of this feature.
    #[must_use]
    pub fn kind(&self) -> Option<GeometryKind> {
        GeometryKind::of(&self.geometry)
    }
}

/// What changed in the store since the previous render.
///
/// Every live feature appears in exactly one of `unchanged`, `created` or
/// `updated`, and every feature removed since the previous render appears once
/// in `deleted_ids`. Keeping the four sets disjoint is the caller's job;
/// adapters do not check it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Live features with no change since the previous render.
    pub unchanged: Vec<Feature>,
    /// Features added since the previous render.
    pub created: Vec<Feature>,
    /// Features whose geometry or properties changed.
    pub updated: Vec<Feature>,
    /// Identifiers removed since the previous render.
    pub deleted_ids: Vec<FeatureId>,
}

impl ChangeSet {
    /// An empty change-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the unchanged set.
    #[must_use]
    pub fn with_unchanged(mut self, features: Vec<Feature>) -> Self {
        self.unchanged = features;
        self
    }

    /// Replace the created set.
    #[must_use]
    pub fn with_created(mut self, features: Vec<Feature>) -> Self {
        self.created = features;
        self
    }

    /// Replace the updated set.
    #[must_use]
    pub fn with_updated(mut self, features: Vec<Feature>) -> Self {
        self.updated = features;
        self
    }

    /// Replace the deleted identifiers.
    #[must_use]
    pub fn with_deleted<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FeatureId>,
    {
        self.deleted_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// All features live after this change-set: unchanged, then created, then
    /// updated.
    pub fn live_features(&self) -> impl Iterator<Item = &Feature> {
        self.unchanged
            .iter()
            .chain(&self.created)
            .chain(&self.updated)
    }

    /// `true` when the change-set carries no features and no deletions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unchanged.is_empty()
            && self.created.is_empty()
            && self.updated.is_empty()
            && self.deleted_ids.is_empty()
    }

    /// Identifiers that appear more than once across the four sets, sorted.
    ///
    /// Intended for debugging callers; `render` never calls it.
    #[must_use]
    pub fn partition_violations(&self) -> Vec<FeatureId> {
        let mut seen: HashMap<&FeatureId, usize> = HashMap::new();
        for id in self
            .live_features()
            .map(|feature| &feature.id)
            .chain(&self.deleted_ids)
        {
            *seen.entry(id).or_default() += 1;
        }
        let mut repeated: Vec<FeatureId> = seen
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(id, _)| id.clone())
            .collect();
        repeated.sort();
        repeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, Point, Rect, coord};
    use rstest::rstest;

    fn point(id: &str) -> Feature {
        Feature::new(id, Geometry::Point(Point::new(0.0, 0.0)))
    }

    #[rstest]
    fn live_features_follow_set_order() {
        let changes = ChangeSet::new()
            .with_unchanged(vec![point("a")])
            .with_created(vec![point("b")])
            .with_updated(vec![point("c")])
            .with_deleted(["d"]);
        let ids: Vec<_> = changes.live_features().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[rstest]
    fn reports_ids_present_in_two_sets() {
        let changes = ChangeSet::new()
            .with_created(vec![point("a"), point("b")])
            .with_deleted(["b"]);
        assert_eq!(changes.partition_violations(), vec![FeatureId::from("b")]);
    }

    #[rstest]
    fn disjoint_sets_have_no_violations() {
        let changes = ChangeSet::new()
            .with_unchanged(vec![point("a")])
            .with_deleted(["b"]);
        assert!(changes.partition_violations().is_empty());
        assert!(!changes.is_empty());
        assert!(ChangeSet::new().is_empty());
    }

    #[rstest]
    #[case(Geometry::Point(Point::new(0.0, 0.0)), Some(GeometryKind::Point))]
    #[case(
        Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])),
        Some(GeometryKind::LineString)
    )]
    #[case(
        Geometry::Rect(Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })),
        Some(GeometryKind::Polygon)
    )]
    fn classifies_geometry(#[case] geometry: Geometry<f64>, #[case] expected: Option<GeometryKind>) {
        assert_eq!(GeometryKind::of(&geometry), expected);
    }

    #[rstest]
    fn reads_mode_property() {
        let feature = point("a").with_property("mode", "polygon");
        assert_eq!(feature.mode(), Some("polygon"));
        assert_eq!(point("b").mode(), None);
    }
}
