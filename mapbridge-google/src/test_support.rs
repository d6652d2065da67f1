//! In-memory stand-ins for the Google Maps API.
//!
//! Projection is backed by a [`WebMercator`] viewport. The data layer keeps
//! its features in insertion order and records imports, removals, lookups
//! and listener registrations.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use mapbridge_core::test_support::{MockContainer, WebMercator};
use mapbridge_core::{FeatureId, ListenerId, LngLat, PixelPoint};
use serde_json::Value;

use crate::DataStyle;
use crate::host::{
    DataEventKind, DataFeature, DataGeometry, DataHandler, DataLayer, DataMouseEvent,
    DataStyleFn, GoogleMap, LatLngBounds, MapCanvasProjection, MapOptions, MapsLibrary,
    OverlayView,
};

/// Viewport over central London used across the Google tests.
#[must_use]
pub const fn london_view() -> WebMercator {
    WebMercator {
        center: LngLat::new(-0.1278, 51.5074),
        zoom: 12.0,
        width: 800.0,
        height: 600.0,
    }
}

#[derive(Debug, Default)]
struct ProjectionState {
    view: Option<WebMercator>,
    failing: bool,
    queries: usize,
}

/// `google.maps` namespace double.
#[derive(Debug, Default)]
pub struct MockMapsLibrary {
    state: Rc<RefCell<ProjectionState>>,
    overlays: Cell<usize>,
}

impl MockMapsLibrary {
    /// A library whose overlays project through `view`.
    #[must_use]
    pub fn with_view(view: WebMercator) -> Self {
        let lib = Self::default();
        lib.set_view(Some(view));
        lib
    }

    /// Replace the viewport; `None` makes overlays report no projection.
    pub fn set_view(&self, view: Option<WebMercator>) {
        self.state.borrow_mut().view = view;
    }

    /// Make every conversion return nothing.
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Number of `getProjection()` calls across all overlays.
    #[must_use]
    pub fn projection_queries(&self) -> usize {
        self.state.borrow().queries
    }

    /// Number of overlays created.
    #[must_use]
    pub fn overlays_created(&self) -> usize {
        self.overlays.get()
    }
}

impl MapsLibrary for MockMapsLibrary {
    type Overlay = MockOverlay;

    fn overlay_view<M: GoogleMap>(&self, _map: &M) -> Self::Overlay {
        self.overlays.set(self.overlays.get() + 1);
        MockOverlay {
            state: Rc::clone(&self.state),
        }
    }

    fn bounds_contains(&self, bounds: &LatLngBounds, position: LngLat) -> bool {
        (bounds.south_west.lng..=bounds.north_east.lng).contains(&position.lng)
            && (bounds.south_west.lat..=bounds.north_east.lat).contains(&position.lat)
    }
}

/// Overlay sharing the library's projection state.
#[derive(Debug)]
pub struct MockOverlay {
    state: Rc<RefCell<ProjectionState>>,
}

impl OverlayView for MockOverlay {
    type Projection = MockCanvasProjection;

    fn projection(&self) -> Option<Self::Projection> {
        let mut state = self.state.borrow_mut();
        state.queries += 1;
        let failing = state.failing;
        state
            .view
            .map(|view| MockCanvasProjection { view, failing })
    }
}

/// Projection snapshot handed out by [`MockOverlay`].
#[derive(Debug, Clone, Copy)]
pub struct MockCanvasProjection {
    view: WebMercator,
    failing: bool,
}

impl MapCanvasProjection for MockCanvasProjection {
    fn from_lat_lng_to_container_pixel(&self, position: LngLat) -> Option<PixelPoint> {
        (!self.failing).then(|| self.view.project(position))
    }

    fn from_container_pixel_to_lat_lng(&self, pixel: PixelPoint) -> Option<LngLat> {
        (!self.failing).then(|| self.view.unproject(pixel))
    }
}

#[derive(Debug, Default)]
struct FeatureState {
    id: Option<FeatureId>,
    properties: BTreeMap<String, Value>,
    geometry: Option<DataGeometry>,
    geometry_writes: usize,
}

/// `google.maps.Data.Feature` double. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockDataFeature {
    inner: Rc<RefCell<FeatureState>>,
}

impl MockDataFeature {
    fn from_geo_json(value: &Value) -> Self {
        let feature = Self::default();
        {
            let mut state = feature.inner.borrow_mut();
            state.id = value.get("id").and_then(Value::as_str).map(FeatureId::from);
            if let Some(properties) = value.get("properties").and_then(Value::as_object) {
                state.properties = properties
                    .iter()
                    .map(|(name, property)| (name.clone(), property.clone()))
                    .collect();
            }
        }
        feature
    }

    /// Current value of property `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Value> {
        self.inner.borrow().properties.get(name).cloned()
    }

    /// Geometry set with `setGeometry`; `None` while it still holds the
    /// imported geometry.
    #[must_use]
    pub fn geometry(&self) -> Option<DataGeometry> {
        self.inner.borrow().geometry.clone()
    }

    /// Number of `setGeometry` calls.
    #[must_use]
    pub fn geometry_writes(&self) -> usize {
        self.inner.borrow().geometry_writes
    }

    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl DataFeature for MockDataFeature {
    fn id(&self) -> Option<FeatureId> {
        self.inner.borrow().id.clone()
    }

    fn property_names(&self) -> Vec<String> {
        self.inner.borrow().properties.keys().cloned().collect()
    }

    fn set_property(&self, name: &str, value: &Value) {
        self.inner
            .borrow_mut()
            .properties
            .insert(name.to_owned(), value.clone());
    }

    fn remove_property(&self, name: &str) {
        self.inner.borrow_mut().properties.remove(name);
    }

    fn set_geometry(&self, geometry: DataGeometry) {
        let mut state = self.inner.borrow_mut();
        state.geometry = Some(geometry);
        state.geometry_writes += 1;
    }
}

type SharedDataHandler = Rc<RefCell<DataHandler>>;
type SharedStyleFn = Rc<dyn Fn(&MockDataFeature) -> DataStyle>;

#[derive(Default)]
struct DataState {
    features: Vec<MockDataFeature>,
    listeners: Vec<(ListenerId, DataEventKind, SharedDataHandler)>,
    listener_log: Vec<DataEventKind>,
    next_listener: u64,
    imports: Vec<Value>,
    removed: Vec<FeatureId>,
    lookups: usize,
    style: Option<SharedStyleFn>,
    style_installs: usize,
}

/// `google.maps.Data` double.
#[derive(Default)]
pub struct MockDataLayer {
    state: RefCell<DataState>,
}

impl MockDataLayer {
    /// Kinds passed to `addListener`, in call order.
    #[must_use]
    pub fn listener_log(&self) -> Vec<DataEventKind> {
        self.state.borrow().listener_log.clone()
    }

    /// Listeners currently attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Collections passed to `addGeoJson`, in call order.
    #[must_use]
    pub fn imports(&self) -> Vec<Value> {
        self.state.borrow().imports.clone()
    }

    /// Ids of features passed to `remove`, in call order.
    #[must_use]
    pub fn removed(&self) -> Vec<FeatureId> {
        self.state.borrow().removed.clone()
    }

    /// Number of `getFeatureById` calls.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.state.borrow().lookups
    }

    /// Number of `setStyle` calls.
    #[must_use]
    pub fn style_installs(&self) -> usize {
        self.state.borrow().style_installs
    }

    /// Ids of the features in the layer, in insertion order.
    #[must_use]
    pub fn native_ids(&self) -> Vec<FeatureId> {
        self.state
            .borrow()
            .features
            .iter()
            .filter_map(DataFeature::id)
            .collect()
    }

    /// The feature with `id`, without counting a lookup.
    #[must_use]
    pub fn feature(&self, id: &FeatureId) -> Option<MockDataFeature> {
        self.state
            .borrow()
            .features
            .iter()
            .find(|feature| feature.id().as_ref() == Some(id))
            .cloned()
    }

    /// Drop a feature as if something outside the adapter removed it.
    pub fn forget(&self, id: &FeatureId) {
        self.state
            .borrow_mut()
            .features
            .retain(|feature| feature.id().as_ref() != Some(id));
    }

    /// Evaluate the installed style for every feature.
    #[must_use]
    pub fn styles(&self) -> Vec<(FeatureId, DataStyle)> {
        let (style, features) = {
            let state = self.state.borrow();
            (state.style.clone(), state.features.clone())
        };
        let Some(style) = style else {
            return Vec::new();
        };
        features
            .iter()
            .filter_map(|feature| Some((feature.id()?, style(feature))))
            .collect()
    }

    /// Deliver `event` to every listener for `kind`.
    pub fn dispatch(&self, kind: DataEventKind, event: &DataMouseEvent) {
        let handlers: Vec<SharedDataHandler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, listened, _)| *listened == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            let mut call = handler.borrow_mut();
            (&mut **call)(event);
        }
    }
}

impl DataLayer for MockDataLayer {
    type Feature = MockDataFeature;

    fn add_listener(&self, kind: DataEventKind, handler: DataHandler) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state
            .listeners
            .push((id, kind, Rc::new(RefCell::new(handler))));
        state.listener_log.push(kind);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(listener, _, _)| *listener != id);
    }

    fn add_geo_json(&self, collection: &Value) -> Vec<Self::Feature> {
        let created: Vec<MockDataFeature> = collection
            .get("features")
            .and_then(Value::as_array)
            .map(|features| features.iter().map(MockDataFeature::from_geo_json).collect())
            .unwrap_or_default();
        let mut state = self.state.borrow_mut();
        state.imports.push(collection.clone());
        state.features.extend(created.iter().cloned());
        created
    }

    fn feature_by_id(&self, id: &FeatureId) -> Option<Self::Feature> {
        self.state.borrow_mut().lookups += 1;
        self.feature(id)
    }

    fn remove(&self, feature: &Self::Feature) {
        let mut state = self.state.borrow_mut();
        state.features.retain(|held| !held.same(feature));
        if let Some(id) = feature.id() {
            state.removed.push(id);
        }
    }

    fn set_style(&self, style: DataStyleFn<Self::Feature>) {
        let mut state = self.state.borrow_mut();
        state.style = Some(Rc::from(style));
        state.style_installs += 1;
    }
}

/// `google.maps.Map` double.
pub struct MockGoogleMap {
    container: MockContainer,
    bounds: Cell<Option<LatLngBounds>>,
    data: MockDataLayer,
    div_calls: Cell<usize>,
    options: RefCell<Vec<MapOptions>>,
}

impl MockGoogleMap {
    /// A map rendered into `container` whose bounds match `view`.
    #[must_use]
    pub fn for_view(container: MockContainer, view: WebMercator) -> Self {
        let (south_west, north_east) = view.bounds();
        Self {
            container,
            bounds: Cell::new(Some(LatLngBounds {
                south_west,
                north_east,
            })),
            data: MockDataLayer::default(),
            div_calls: Cell::new(0),
            options: RefCell::new(Vec::new()),
        }
    }

    /// Replace the bounds reported by `getBounds()`.
    pub fn set_bounds(&self, bounds: Option<LatLngBounds>) {
        self.bounds.set(bounds);
    }

    /// The container, without counting a `getDiv()` call.
    #[must_use]
    pub fn container(&self) -> MockContainer {
        self.container.clone()
    }

    /// The data layer.
    #[must_use]
    pub const fn data_layer(&self) -> &MockDataLayer {
        &self.data
    }

    /// Number of `getDiv()` calls.
    #[must_use]
    pub fn div_calls(&self) -> usize {
        self.div_calls.get()
    }

    /// Options passed to `setOptions`, in call order.
    #[must_use]
    pub fn options(&self) -> Vec<MapOptions> {
        self.options.borrow().clone()
    }
}

impl GoogleMap for MockGoogleMap {
    type Container = MockContainer;
    type Data = MockDataLayer;

    fn div(&self) -> Self::Container {
        self.div_calls.set(self.div_calls.get() + 1);
        self.container.clone()
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds.get()
    }

    fn data(&self) -> &Self::Data {
        &self.data
    }

    fn set_options(&self, options: &MapOptions) {
        self.options.borrow_mut().push(*options);
    }
}
