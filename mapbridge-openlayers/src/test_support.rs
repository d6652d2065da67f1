//! In-memory stand-ins for the OpenLayers API.
//!
//! The library transforms between longitude/latitude and spherical Mercator
//! metres (`EPSG:3857`). The map's frame state is a [`WebMercator`]
//! viewport, so pixel lookups assume the view uses `EPSG:3857`.

use std::cell::{Cell, RefCell};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::rc::Rc;

use mapbridge_core::test_support::{MockContainer, WebMercator};
use mapbridge_core::{FeatureId, LngLat, PixelPoint};
use serde_json::Value;

use crate::OlStyle;
use crate::host::{Coordinate, LayerStyleFn, OlFeature, OpenLayersLibrary, OpenLayersMap};

const EARTH_RADIUS: f64 = 6_378_137.0;

/// Viewport over central Paris used across the OpenLayers tests.
#[must_use]
pub const fn paris_view() -> WebMercator {
    WebMercator {
        center: LngLat::new(2.3522, 48.8566),
        zoom: 11.0,
        width: 1024.0,
        height: 768.0,
    }
}

/// `EPSG:3857` metres for `position`.
#[must_use]
pub fn mercator_metres(position: LngLat) -> Coordinate {
    [
        EARTH_RADIUS * position.lng.to_radians(),
        EARTH_RADIUS * (FRAC_PI_4 + position.lat.to_radians() / 2.0).tan().ln(),
    ]
}

/// Position for `EPSG:3857` metres.
#[must_use]
pub fn from_mercator_metres(coordinate: Coordinate) -> LngLat {
    let [x, y] = coordinate;
    LngLat::new(
        (x / EARTH_RADIUS).to_degrees(),
        (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
    )
}

/// `ol/Feature` double.
#[derive(Debug, Clone, PartialEq)]
pub struct MockOlFeature {
    id: Option<FeatureId>,
    geometry_type: Option<String>,
}

impl MockOlFeature {
    fn from_geo_json(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(Value::as_str).map(FeatureId::from),
            geometry_type: value
                .get("geometry")
                .and_then(|geometry| geometry.get("type"))
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// GeoJSON geometry type the feature was read from.
    #[must_use]
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry_type.as_deref()
    }
}

impl OlFeature for MockOlFeature {
    fn id(&self) -> Option<FeatureId> {
        self.id.clone()
    }
}

/// `ol/source/Vector` double.
#[derive(Debug, Clone)]
pub struct MockSource {
    features: Vec<MockOlFeature>,
}

/// `ol/layer/Vector` double. Clones refer to the same layer.
#[derive(Clone)]
pub struct MockLayer {
    id: u64,
    features: Vec<MockOlFeature>,
    style: Rc<dyn Fn(&MockOlFeature) -> Option<OlStyle>>,
}

impl MockLayer {
    /// Creation order, starting at 1.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Ids of the features in the layer's source.
    #[must_use]
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.iter().filter_map(OlFeature::id).collect()
    }

    /// The layer's features.
    #[must_use]
    pub fn features(&self) -> &[MockOlFeature] {
        &self.features
    }

    /// Evaluate the style function for every feature, as a render would.
    #[must_use]
    pub fn styles(&self) -> Vec<(Option<FeatureId>, Option<OlStyle>)> {
        self.features
            .iter()
            .map(|feature| (feature.id(), (self.style)(feature)))
            .collect()
    }
}

impl fmt::Debug for MockLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockLayer")
            .field("id", &self.id)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct LibraryState {
    reads: Vec<(Value, String)>,
    sources: usize,
    layers: u64,
    failing: bool,
    transform_codes: Vec<String>,
}

/// OpenLayers module double.
#[derive(Debug, Default)]
pub struct MockOlLibrary {
    state: RefCell<LibraryState>,
}

impl MockOlLibrary {
    /// Make every projection transform return nothing.
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Collections and feature projections passed to `readFeatures`.
    #[must_use]
    pub fn reads(&self) -> Vec<(Value, String)> {
        self.state.borrow().reads.clone()
    }

    /// Number of vector sources built.
    #[must_use]
    pub fn sources_built(&self) -> usize {
        self.state.borrow().sources
    }

    /// Number of vector layers built.
    #[must_use]
    pub fn layers_built(&self) -> u64 {
        self.state.borrow().layers
    }

    /// Projection codes passed to `fromLonLat` and `toLonLat`.
    #[must_use]
    pub fn transform_codes(&self) -> Vec<String> {
        self.state.borrow().transform_codes.clone()
    }

    fn transform(&self, code: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.transform_codes.push(code.to_owned());
        !state.failing
    }
}

impl OpenLayersLibrary for MockOlLibrary {
    type Feature = MockOlFeature;
    type Source = MockSource;
    type Layer = MockLayer;

    fn read_features(&self, collection: &Value, feature_projection: &str) -> Vec<Self::Feature> {
        self.state
            .borrow_mut()
            .reads
            .push((collection.clone(), feature_projection.to_owned()));
        collection
            .get("features")
            .and_then(Value::as_array)
            .map(|features| features.iter().map(MockOlFeature::from_geo_json).collect())
            .unwrap_or_default()
    }

    fn vector_source(&self, features: Vec<Self::Feature>) -> Self::Source {
        self.state.borrow_mut().sources += 1;
        MockSource { features }
    }

    fn vector_layer(
        &self,
        source: Self::Source,
        style: LayerStyleFn<Self::Feature>,
    ) -> Self::Layer {
        let mut state = self.state.borrow_mut();
        state.layers += 1;
        MockLayer {
            id: state.layers,
            features: source.features,
            style: Rc::from(style),
        }
    }

    fn from_lon_lat(&self, position: LngLat, projection: &str) -> Option<Coordinate> {
        if !self.transform(projection) {
            return None;
        }
        match projection {
            "EPSG:3857" => Some(mercator_metres(position)),
            "EPSG:4326" => Some([position.lng, position.lat]),
            _ => None,
        }
    }

    fn to_lon_lat(&self, coordinate: Coordinate, projection: &str) -> Option<LngLat> {
        if !self.transform(projection) {
            return None;
        }
        match projection {
            "EPSG:3857" => Some(from_mercator_metres(coordinate)),
            "EPSG:4326" => {
                let [lng, lat] = coordinate;
                Some(LngLat::new(lng, lat))
            }
            _ => None,
        }
    }
}

/// `ol/Map` double.
pub struct MockOlMap {
    viewport: MockContainer,
    projection_code: RefCell<Option<String>>,
    view: Cell<Option<WebMercator>>,
    layers: RefCell<Vec<MockLayer>>,
    removed: RefCell<Vec<u64>>,
    drag_pan: RefCell<Vec<bool>>,
    double_click_zoom: RefCell<Vec<bool>>,
    viewport_calls: Cell<usize>,
}

impl MockOlMap {
    /// A map in `EPSG:3857` that has rendered `view` into `viewport`.
    #[must_use]
    pub fn rendered(viewport: MockContainer, view: WebMercator) -> Self {
        Self {
            viewport,
            projection_code: RefCell::new(Some("EPSG:3857".to_owned())),
            view: Cell::new(Some(view)),
            layers: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
            drag_pan: RefCell::new(Vec::new()),
            double_click_zoom: RefCell::new(Vec::new()),
            viewport_calls: Cell::new(0),
        }
    }

    /// Replace the view projection code.
    pub fn set_projection_code(&self, code: Option<&str>) {
        *self.projection_code.borrow_mut() = code.map(str::to_owned);
    }

    /// Replace the frame state; `None` behaves like a map that has not
    /// rendered yet.
    pub fn set_view(&self, view: Option<WebMercator>) {
        self.view.set(view);
    }

    /// The viewport, without counting a `getViewport()` call.
    #[must_use]
    pub fn container(&self) -> MockContainer {
        self.viewport.clone()
    }

    /// Number of `getViewport()` calls.
    #[must_use]
    pub fn viewport_calls(&self) -> usize {
        self.viewport_calls.get()
    }

    /// Layers currently on the map, in stacking order.
    #[must_use]
    pub fn layers(&self) -> Vec<MockLayer> {
        self.layers.borrow().clone()
    }

    /// Ids of layers passed to `removeLayer`, in call order.
    #[must_use]
    pub fn removed_layers(&self) -> Vec<u64> {
        self.removed.borrow().clone()
    }

    /// Values passed to the `DragPan` toggle, in call order.
    #[must_use]
    pub fn drag_pan(&self) -> Vec<bool> {
        self.drag_pan.borrow().clone()
    }

    /// Values passed to the `DoubleClickZoom` toggle, in call order.
    #[must_use]
    pub fn double_click_zoom(&self) -> Vec<bool> {
        self.double_click_zoom.borrow().clone()
    }
}

impl OpenLayersMap<MockLayer> for MockOlMap {
    type Container = MockContainer;

    fn viewport(&self) -> Self::Container {
        self.viewport_calls.set(self.viewport_calls.get() + 1);
        self.viewport.clone()
    }

    fn projection_code(&self) -> Option<String> {
        self.projection_code.borrow().clone()
    }

    fn pixel_from_coordinate(&self, coordinate: Coordinate) -> Option<PixelPoint> {
        self.view
            .get()
            .map(|view| view.project(from_mercator_metres(coordinate)))
    }

    fn coordinate_from_pixel(&self, pixel: PixelPoint) -> Option<Coordinate> {
        self.view
            .get()
            .map(|view| mercator_metres(view.unproject(pixel)))
    }

    fn add_layer(&self, layer: &MockLayer) {
        self.layers.borrow_mut().push(layer.clone());
    }

    fn remove_layer(&self, layer: &MockLayer) {
        self.layers.borrow_mut().retain(|held| held.id != layer.id);
        self.removed.borrow_mut().push(layer.id);
    }

    fn set_drag_pan_active(&self, active: bool) {
        self.drag_pan.borrow_mut().push(active);
    }

    fn set_double_click_zoom_active(&self, active: bool) {
        self.double_click_zoom.borrow_mut().push(active);
    }
}
