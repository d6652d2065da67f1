//! The parts of the OpenLayers API the adapter drives.

use mapbridge_core::{FeatureId, LngLat, MapContainer, PixelPoint};
use serde_json::Value;

use crate::OlStyle;

/// An OpenLayers coordinate in the view projection's units.
pub type Coordinate = [f64; 2];

/// `ol/Feature`.
pub trait OlFeature {
    /// `getId()`
    fn id(&self) -> Option<FeatureId>;
}

/// Style callback installed on a vector layer. `None` leaves the feature
/// undrawn.
pub type LayerStyleFn<F> = Box<dyn Fn(&F) -> Option<OlStyle>>;

/// The OpenLayers modules the adapter constructs objects from.
pub trait OpenLayersLibrary {
    /// `ol/Feature`
    type Feature: OlFeature;
    /// `ol/source/Vector`
    type Source;
    /// `ol/layer/Vector`
    type Layer;

    /// `new GeoJSON().readFeatures(collection, { featureProjection })`
    fn read_features(&self, collection: &Value, feature_projection: &str) -> Vec<Self::Feature>;

    /// `new VectorSource({ features })`
    fn vector_source(&self, features: Vec<Self::Feature>) -> Self::Source;

    /// `new VectorLayer({ source, style })`
    fn vector_layer(&self, source: Self::Source, style: LayerStyleFn<Self::Feature>)
    -> Self::Layer;

    /// `fromLonLat(position, projection)`
    fn from_lon_lat(&self, position: LngLat, projection: &str) -> Option<Coordinate>;

    /// `toLonLat(coordinate, projection)`
    fn to_lon_lat(&self, coordinate: Coordinate, projection: &str) -> Option<LngLat>;
}

/// A live `ol/Map` holding layers of type `Layer`.
pub trait OpenLayersMap<Layer> {
    /// Element type returned by `getViewport()`.
    type Container: MapContainer;

    /// `getViewport()`
    fn viewport(&self) -> Self::Container;

    /// `getView().getProjection().getCode()`; `None` before a view is set.
    fn projection_code(&self) -> Option<String>;

    /// `getPixelFromCoordinate`; `None` until the first frame renders.
    fn pixel_from_coordinate(&self, coordinate: Coordinate) -> Option<PixelPoint>;

    /// `getCoordinateFromPixel`; `None` until the first frame renders.
    fn coordinate_from_pixel(&self, pixel: PixelPoint) -> Option<Coordinate>;

    /// `addLayer(layer)`
    fn add_layer(&self, layer: &Layer);

    /// `removeLayer(layer)`
    fn remove_layer(&self, layer: &Layer);

    /// Toggle the `DragPan` interaction.
    fn set_drag_pan_active(&self, active: bool);

    /// Toggle the `DoubleClickZoom` interaction.
    fn set_double_click_zoom_active(&self, active: bool);
}
