//! The parts of the Google Maps JavaScript API the adapter drives.
//!
//! A browser binding implements these over `google.maps`; the test doubles in
//! [`crate::test_support`] implement them in memory.

use geo::{Geometry, LineString, Polygon};
use mapbridge_core::{FeatureId, ListenerId, LngLat, MapContainer, PixelPoint};
use serde_json::Value;

/// `google.maps.MapCanvasProjection`.
pub trait MapCanvasProjection {
    /// Container pixel for `position`, or `None` when the engine cannot say.
    fn from_lat_lng_to_container_pixel(&self, position: LngLat) -> Option<PixelPoint>;

    /// Position under container pixel `pixel`.
    fn from_container_pixel_to_lat_lng(&self, pixel: PixelPoint) -> Option<LngLat>;
}

/// `google.maps.OverlayView` attached to the map.
pub trait OverlayView {
    /// Projection type handed out once the overlay has been drawn.
    type Projection: MapCanvasProjection;

    /// `getProjection()`; `None` until the map has initialised.
    fn projection(&self) -> Option<Self::Projection>;
}

/// `google.maps.LatLngBounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LngLat,
    /// North-east corner.
    pub north_east: LngLat,
}

/// The `google.maps` namespace.
pub trait MapsLibrary {
    /// Overlay type created by [`MapsLibrary::overlay_view`].
    type Overlay: OverlayView;

    /// Create an overlay attached to `map`, used only for its projection.
    fn overlay_view<M: GoogleMap>(&self, map: &M) -> Self::Overlay;

    /// `LatLngBounds.contains`, which handles antimeridian wrapping.
    fn bounds_contains(&self, bounds: &LatLngBounds, position: LngLat) -> bool;
}

/// Subset of `google.maps.MapOptions` the adapter toggles. `None` leaves the
/// option alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapOptions {
    /// Whether the map pans when dragged.
    pub draggable: Option<bool>,
    /// Whether double-click zoom is disabled.
    pub disable_double_click_zoom: Option<bool>,
}

/// A live `google.maps.Map`.
pub trait GoogleMap {
    /// Element type returned by `getDiv()`.
    type Container: MapContainer;
    /// Data layer type.
    type Data: DataLayer;

    /// `getDiv()`
    fn div(&self) -> Self::Container;

    /// `getBounds()`; `None` before the first idle event.
    fn bounds(&self) -> Option<LatLngBounds>;

    /// The map's `data` layer.
    fn data(&self) -> &Self::Data;

    /// `setOptions(...)`
    fn set_options(&self, options: &MapOptions);
}

/// Data layer events the adapter listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataEventKind {
    /// `click`
    Click,
    /// `mousemove`
    MouseMove,
}

impl DataEventKind {
    /// Event name passed to `addListener`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseMove => "mousemove",
        }
    }
}

/// `google.maps.Data.MouseEvent`, reduced to what the adapter reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataMouseEvent {
    /// Position under the pointer.
    pub lat_lng: LngLat,
    /// Horizontal viewport offset of the underlying DOM event.
    pub client_x: f64,
    /// Vertical viewport offset of the underlying DOM event.
    pub client_y: f64,
}

/// Listener callback for data layer events.
pub type DataHandler = Box<dyn FnMut(&DataMouseEvent)>;

/// Style function installed with [`DataLayer::set_style`].
pub type DataStyleFn<F> = Box<dyn Fn(&F) -> crate::DataStyle>;

/// `google.maps.Data`.
pub trait DataLayer {
    /// Native feature handle.
    type Feature: DataFeature;

    /// `addListener(kind, handler)`
    fn add_listener(&self, kind: DataEventKind, handler: DataHandler) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// `addGeoJson(collection)`; returns the features created.
    fn add_geo_json(&self, collection: &Value) -> Vec<Self::Feature>;

    /// `getFeatureById(id)`
    fn feature_by_id(&self, id: &FeatureId) -> Option<Self::Feature>;

    /// `remove(feature)`
    fn remove(&self, feature: &Self::Feature);

    /// `setStyle(fn)`; replaces any previous style.
    fn set_style(&self, style: DataStyleFn<Self::Feature>);
}

/// `google.maps.Data.Feature`.
pub trait DataFeature {
    /// `getId()`
    fn id(&self) -> Option<FeatureId>;

    /// Names visited by `forEachProperty`.
    fn property_names(&self) -> Vec<String>;

    /// `setProperty(name, value)`
    fn set_property(&self, name: &str, value: &Value);

    /// `removeProperty(name)`
    fn remove_property(&self, name: &str);

    /// `setGeometry(geometry)`
    fn set_geometry(&self, geometry: DataGeometry);
}

/// Geometry in the shape of the `google.maps.Data` geometry classes.
///
/// Bindings build the matching `Data.Point`, `Data.LineString`,
/// `Data.Polygon` (and multi variants) from it. Polygon rings keep their
/// closing position.
#[derive(Debug, Clone, PartialEq)]
pub enum DataGeometry {
    /// `Data.Point`
    Point(LngLat),
    /// `Data.MultiPoint`
    MultiPoint(Vec<LngLat>),
    /// `Data.LineString`
    LineString(Vec<LngLat>),
    /// `Data.MultiLineString`
    MultiLineString(Vec<Vec<LngLat>>),
    /// `Data.Polygon`, exterior ring first.
    Polygon(Vec<Vec<LngLat>>),
    /// `Data.MultiPolygon`
    MultiPolygon(Vec<Vec<Vec<LngLat>>>),
    /// `Data.GeometryCollection`
    Collection(Vec<DataGeometry>),
}

fn path(line: &LineString<f64>) -> Vec<LngLat> {
    line.coords().copied().map(LngLat::from).collect()
}

fn rings(polygon: &Polygon<f64>) -> Vec<Vec<LngLat>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(path)
        .collect()
}

impl From<&Geometry<f64>> for DataGeometry {
    fn from(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(point) => Self::Point(point.0.into()),
            Geometry::Line(line) => Self::LineString(vec![line.start.into(), line.end.into()]),
            Geometry::LineString(line) => Self::LineString(path(line)),
            Geometry::Polygon(polygon) => Self::Polygon(rings(polygon)),
            Geometry::MultiPoint(points) => {
                Self::MultiPoint(points.iter().map(|point| LngLat::from(point.0)).collect())
            }
            Geometry::MultiLineString(lines) => {
                Self::MultiLineString(lines.iter().map(path).collect())
            }
            Geometry::MultiPolygon(polygons) => {
                Self::MultiPolygon(polygons.iter().map(rings).collect())
            }
            Geometry::GeometryCollection(collection) => {
                Self::Collection(collection.iter().map(Self::from).collect())
            }
            Geometry::Rect(rect) => Self::Polygon(rings(&rect.to_polygon())),
            Geometry::Triangle(triangle) => Self::Polygon(rings(&triangle.to_polygon())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, polygon};
    use rstest::rstest;

    #[rstest]
    fn converts_point() {
        let geometry = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(
            DataGeometry::from(&geometry),
            DataGeometry::Point(LngLat::new(1.0, 2.0))
        );
    }

    #[rstest]
    fn converts_polygon_with_closed_ring() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ];
        let DataGeometry::Polygon(rings) = DataGeometry::from(&Geometry::Polygon(square)) else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings.first().map(Vec::len), Some(4));
    }

    #[rstest]
    #[case(DataEventKind::Click, "click")]
    #[case(DataEventKind::MouseMove, "mousemove")]
    fn names_data_events(#[case] kind: DataEventKind, #[case] name: &str) {
        assert_eq!(kind.as_str(), name);
    }
}
