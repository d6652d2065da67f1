//! GeoJSON encoding for features handed to engine importers.
//!
//! Engines ingest features through their own GeoJSON readers, so adapters
//! serialise the store's features into RFC 7946 values first. Lines,
//! rectangles and triangles have no GeoJSON counterpart and are encoded as
//! `LineString` and `Polygon`.

use geo::{Coord, Geometry, LineString, Polygon};
use serde_json::{Value, json};

use crate::Feature;

/// Encode `features` as a `FeatureCollection`.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, Point};
/// use mapbridge_core::{Feature, geojson::feature_collection};
///
/// let feature = Feature::new("point-1", Geometry::Point(Point::new(1.0, 2.0)));
/// let collection = feature_collection([&feature]);
/// assert_eq!(collection["type"], "FeatureCollection");
/// assert_eq!(collection["features"][0]["id"], "point-1");
/// assert_eq!(collection["features"][0]["geometry"]["coordinates"][1], 2.0);
/// ```
#[must_use]
pub fn feature_collection<'a, I>(features: I) -> Value
where
    I: IntoIterator<Item = &'a Feature>,
{
    json!({
        "type": "FeatureCollection",
        "features": features.into_iter().map(feature).collect::<Vec<_>>(),
    })
}

/// Encode a single feature.
#[must_use]
pub fn feature(feature: &Feature) -> Value {
    json!({
        "type": "Feature",
        "id": feature.id.as_str(),
        "geometry": geometry(&feature.geometry),
        "properties": Value::Object(feature.properties.clone()),
    })
}

/// Encode a geometry.
#[must_use]
pub fn geometry(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(point) => typed("Point", position(point.0)),
        Geometry::Line(line) => typed(
            "LineString",
            Value::Array(vec![position(line.start), position(line.end)]),
        ),
        Geometry::LineString(line) => typed("LineString", positions(line)),
        Geometry::Polygon(polygon) => typed("Polygon", rings(polygon)),
        Geometry::MultiPoint(points) => typed(
            "MultiPoint",
            points.iter().map(|point| position(point.0)).collect(),
        ),
        Geometry::MultiLineString(lines) => {
            typed("MultiLineString", lines.iter().map(positions).collect())
        }
        Geometry::MultiPolygon(polygons) => {
            typed("MultiPolygon", polygons.iter().map(rings).collect())
        }
        Geometry::GeometryCollection(collection) => json!({
            "type": "GeometryCollection",
            "geometries": collection.iter().map(self::geometry).collect::<Vec<_>>(),
        }),
        Geometry::Rect(rect) => typed("Polygon", rings(&rect.to_polygon())),
        Geometry::Triangle(triangle) => typed("Polygon", rings(&triangle.to_polygon())),
    }
}

fn typed(kind: &str, coordinates: Value) -> Value {
    json!({ "type": kind, "coordinates": coordinates })
}

fn position(coord: Coord<f64>) -> Value {
    json!([coord.x, coord.y])
}

fn positions(line: &LineString<f64>) -> Value {
    line.coords().map(|coord| position(*coord)).collect()
}

fn rings(polygon: &Polygon<f64>) -> Value {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(positions)
        .collect()
}
