//! [`MapAdapter`] over an OpenLayers map.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use log::debug;
use mapbridge_core::{
    AdapterCallbacks, AdapterConfig, ChangeSet, ConfigError, CursorController, CursorState,
    EventBridge, Feature, FeatureId, LngLat, MapAdapter, MapContainer, MapDraggability,
    PixelPoint, ProjectionError, RawPointerEvent, SharedStyleResolver, StylePriority, geojson,
};

use crate::host::{OlFeature, OpenLayersLibrary, OpenLayersMap};
use crate::{OlProjector, OlStyle};

/// Feature projection used when the view does not report one.
pub const DEFAULT_FEATURE_PROJECTION: &str = "EPSG:3857";

type ViewportStyle<L, M> =
    <<M as OpenLayersMap<<L as OpenLayersLibrary>::Layer>>::Container as MapContainer>::Style;

struct DragPanToggle<Layer, M> {
    map: Rc<M>,
    layer: PhantomData<fn() -> Layer>,
}

impl<Layer, M: OpenLayersMap<Layer>> MapDraggability for DragPanToggle<Layer, M> {
    fn set_draggability(&self, enabled: bool) {
        self.map.set_drag_pan_active(enabled);
    }
}

/// Drives an OpenLayers map through one vector layer.
///
/// Every render rebuilds the layer from the live feature set and swaps it in
/// for the previous one. The layer's style function looks each native
/// feature up in a snapshot taken at render time and asks the caller's
/// resolver how to draw it.
pub struct OpenLayersAdapter<L, M>
where
    L: OpenLayersLibrary + 'static,
    M: OpenLayersMap<L::Layer> + 'static,
{
    lib: Rc<L>,
    map: Rc<M>,
    projector: OlProjector<L, M>,
    config: AdapterConfig,
    bridge: EventBridge,
    registered_on: Option<M::Container>,
    cursor: CursorController<ViewportStyle<L, M>>,
    layer: Option<L::Layer>,
}

impl<L, M> OpenLayersAdapter<L, M>
where
    L: OpenLayersLibrary + 'static,
    M: OpenLayersMap<L::Layer> + 'static,
{
    /// Bind to `map`, using `lib` for the OpenLayers constructors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(lib: Rc<L>, map: Rc<M>, config: AdapterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            projector: OlProjector::new(Rc::clone(&lib), Rc::clone(&map)),
            bridge: EventBridge::new(&config),
            lib,
            map,
            config,
            registered_on: None,
            cursor: CursorController::new(StylePriority::Normal),
            layer: None,
        })
    }

    /// Whether a feature layer is currently on the map.
    #[must_use]
    pub const fn has_layer(&self) -> bool {
        self.layer.is_some()
    }

    fn build_layer(&self, changes: &ChangeSet, styles: &SharedStyleResolver) -> L::Layer {
        let projection = self
            .map
            .projection_code()
            .unwrap_or_else(|| DEFAULT_FEATURE_PROJECTION.to_owned());
        let collection = geojson::feature_collection(changes.live_features());
        let features = self.lib.read_features(&collection, &projection);
        debug!("read {} features in {projection}", features.len());
        let source = self.lib.vector_source(features);

        let snapshot: HashMap<FeatureId, Feature> = changes
            .live_features()
            .map(|feature| (feature.id.clone(), feature.clone()))
            .collect();
        let resolver = Rc::clone(styles);
        self.lib.vector_layer(
            source,
            Box::new(move |native: &L::Feature| {
                let feature = snapshot.get(&native.id()?)?;
                let style = resolver.resolve(feature)?;
                OlStyle::for_feature(feature.kind(), &style)
            }),
        )
    }
}

impl<L, M> MapAdapter for OpenLayersAdapter<L, M>
where
    L: OpenLayersLibrary + 'static,
    M: OpenLayersMap<L::Layer> + 'static,
{
    type Container = M::Container;

    fn map_container(&self) -> Self::Container {
        self.map.viewport()
    }

    fn register(&mut self, callbacks: Rc<dyn AdapterCallbacks>) {
        let container = self.map.viewport();
        let toggle = Rc::new(DragPanToggle::<L::Layer, M> {
            map: Rc::clone(&self.map),
            layer: PhantomData,
        });
        let locator = self.projector.locator(self.config.coordinate_precision);
        if self
            .bridge
            .register(&container, callbacks, toggle, locator)
        {
            self.registered_on = Some(container);
        }
    }

    fn unregister(&mut self) {
        if let Some(container) = self.registered_on.take() {
            self.bridge.unregister(&container);
        }
    }

    fn project(&self, lng: f64, lat: f64) -> Result<PixelPoint, ProjectionError> {
        self.projector.project(lng, lat)
    }

    fn unproject(&self, x: f64, y: f64) -> Result<LngLat, ProjectionError> {
        self.projector.unproject(x, y)
    }

    fn lng_lat_from_event(&self, event: &RawPointerEvent) -> Option<LngLat> {
        self.projector.lng_lat_from_event(event)
    }

    fn set_cursor(&mut self, cursor: CursorState) {
        let map = self.map.as_ref();
        self.cursor.apply(cursor, || map.viewport().inline_style());
    }

    fn set_draggability(&self, enabled: bool) {
        self.map.set_drag_pan_active(enabled);
    }

    fn set_double_click_to_zoom(&self, enabled: bool) {
        self.map.set_double_click_zoom_active(enabled);
    }

    fn coordinate_precision(&self) -> u32 {
        self.config.coordinate_precision
    }

    fn render(&mut self, changes: &ChangeSet, styles: &SharedStyleResolver) {
        let layer = self.build_layer(changes, styles);
        if let Some(previous) = self.layer.take() {
            self.map.remove_layer(&previous);
        }
        self.map.add_layer(&layer);
        self.layer = Some(layer);
        debug!(
            "replaced feature layer: {} created, {} updated, {} deleted",
            changes.created.len(),
            changes.updated.len(),
            changes.deleted_ids.len()
        );
    }

    fn clear(&mut self) {
        if let Some(layer) = self.layer.take() {
            self.map.remove_layer(&layer);
        }
    }
}

impl<L, M> Drop for OpenLayersAdapter<L, M>
where
    L: OpenLayersLibrary + 'static,
    M: OpenLayersMap<L::Layer> + 'static,
{
    fn drop(&mut self) {
        self.unregister();
    }
}
