//! [`MapAdapter`] over a Google Maps map and its data layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace, warn};
use mapbridge_core::{
    AdapterCallbacks, AdapterConfig, ChangeSet, ConfigError, CursorController, CursorState,
    EventBridge, Feature, FeatureId, ListenerId, LngLat, MapAdapter, MapContainer,
    MapDraggability, PixelPoint, ProjectionError, RawPointerEvent, RenderError,
    SharedStyleResolver, StylePriority, geojson,
};

use crate::host::{
    DataEventKind, DataFeature, DataGeometry, DataHandler, DataLayer, DataMouseEvent, GoogleMap,
    MapOptions, MapsLibrary,
};
use crate::{DataStyle, Projector};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

type ContainerStyle<M> = <<M as GoogleMap>::Container as MapContainer>::Style;
type FeatureIndex = Rc<RefCell<HashMap<FeatureId, Feature>>>;

struct MapToggles<M> {
    map: Rc<M>,
}

impl<M: GoogleMap> MapDraggability for MapToggles<M> {
    fn set_draggability(&self, enabled: bool) {
        self.map.set_options(&MapOptions {
            draggable: Some(enabled),
            ..MapOptions::default()
        });
    }
}

/// Drives a Google Maps map through its `Data` layer.
///
/// The first render imports every live feature with one `addGeoJson` call.
/// Later renders touch only what changed: deletions and updates are looked up
/// by id, and updates are applied in place so native listeners survive.
///
/// The adapter remembers which ids it imported. [`MapAdapter::clear`]
/// removes exactly those, and updates for ids it never imported are skipped.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use mapbridge_core::test_support::{MockContainer, point_feature};
/// use mapbridge_core::{
///     AdapterConfig, ChangeSet, Feature, FeatureStyle, MapAdapter, SharedStyleResolver,
/// };
/// use mapbridge_google::GoogleMapsAdapter;
/// use mapbridge_google::test_support::{MockGoogleMap, MockMapsLibrary, london_view};
///
/// let view = london_view();
/// let map = Rc::new(MockGoogleMap::for_view(MockContainer::with_id("map"), view));
/// let lib = Rc::new(MockMapsLibrary::with_view(view));
/// let mut adapter = GoogleMapsAdapter::new(lib, Rc::clone(&map), AdapterConfig::default())?;
///
/// let styles: SharedStyleResolver = Rc::new(|_: &Feature| Some(FeatureStyle::default()));
/// let changes = ChangeSet::new().with_created(vec![point_feature("point-1", -0.12, 51.5)]);
/// adapter.render(&changes, &styles);
/// assert_eq!(map.data_layer().imports().len(), 1);
/// # Ok::<(), mapbridge_core::ConfigError>(())
/// ```
pub struct GoogleMapsAdapter<L, M>
where
    L: MapsLibrary + 'static,
    M: GoogleMap + 'static,
{
    map: Rc<M>,
    projector: Projector<L, M>,
    config: AdapterConfig,
    bridge: EventBridge,
    registered_on: Option<M::Container>,
    cursor: CursorController<ContainerStyle<M>>,
    data_listeners: Vec<ListenerId>,
    index: FeatureIndex,
    populated: bool,
}

impl<L, M> GoogleMapsAdapter<L, M>
where
    L: MapsLibrary + 'static,
    M: GoogleMap + 'static,
{
    /// Bind to `map`, using `lib` for the engine's constructors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(lib: Rc<L>, map: Rc<M>, config: AdapterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            projector: Projector::new(lib, Rc::clone(&map)),
            bridge: EventBridge::new(&config),
            map,
            config,
            registered_on: None,
            cursor: CursorController::new(StylePriority::Important),
            data_listeners: Vec::new(),
            index: Rc::new(RefCell::new(HashMap::new())),
            populated: false,
        })
    }

    /// Ids of the features this adapter currently owns, sorted.
    #[must_use]
    pub fn owned_ids(&self) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self.index.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn listen_to_data(&mut self) {
        for kind in [DataEventKind::Click, DataEventKind::MouseMove] {
            let handler = data_handler(kind);
            self.data_listeners
                .push(self.map.data().add_listener(kind, handler));
        }
        debug!("listening to data layer click and mousemove");
    }

    fn import<'a>(&self, live: impl Iterator<Item = &'a Feature>) {
        let features: Vec<&Feature> = live.collect();
        let imported = self
            .map
            .data()
            .add_geo_json(&geojson::feature_collection(features.iter().copied()));
        debug!("imported {} features into the data layer", imported.len());
        let mut index = self.index.borrow_mut();
        for feature in features {
            index.insert(feature.id.clone(), feature.clone());
        }
    }

    fn remove(&self, id: &FeatureId) {
        if self.index.borrow_mut().remove(id).is_none() {
            debug!("ignoring deletion of feature {id} not added by this adapter");
            return;
        }
        let data = self.map.data();
        match data.feature_by_id(id) {
            Some(native) => data.remove(&native),
            None => debug!("{}", RenderError::FeatureNotFound { id: id.clone() }),
        }
    }

    fn update(&self, feature: &Feature) {
        if !self.index.borrow().contains_key(&feature.id) {
            debug!(
                "ignoring update of feature {} not added by this adapter",
                feature.id
            );
            return;
        }
        let Some(native) = self.map.data().feature_by_id(&feature.id) else {
            debug!(
                "{}",
                RenderError::FeatureNotFound {
                    id: feature.id.clone()
                }
            );
            return;
        };
        native.set_geometry(DataGeometry::from(&feature.geometry));
        for name in native.property_names() {
            if !feature.properties.contains_key(&name) {
                native.remove_property(&name);
            }
        }
        for (name, value) in &feature.properties {
            native.set_property(name, value);
        }
        self.index
            .borrow_mut()
            .insert(feature.id.clone(), feature.clone());
    }

    fn install_style(&self, styles: &SharedStyleResolver) {
        let index = Rc::clone(&self.index);
        let resolver = Rc::clone(styles);
        self.map
            .data()
            .set_style(Box::new(move |native: &<M::Data as DataLayer>::Feature| {
                let owned = index.borrow();
                native
                    .id()
                    .and_then(|id| owned.get(&id))
                    .and_then(|feature| {
                        resolver
                            .resolve(feature)
                            .map(|style| DataStyle::for_feature(feature.kind(), &style))
                    })
                    .unwrap_or_else(DataStyle::hidden)
            }));
    }
}

/// Listener for data-layer `click` and `mousemove`.
///
/// The same input also bubbles to the container's pointer listeners, which
/// own click and drag classification, so the data-layer events are only
/// traced.
fn data_handler(kind: DataEventKind) -> DataHandler {
    Box::new(move |event: &DataMouseEvent| {
        trace!(
            "data layer {} at ({}, {}) left to the pointer listeners",
            kind.as_str(),
            event.lat_lng.lng,
            event.lat_lng.lat
        );
    })
}

fn scoped_cursor_rule<M: GoogleMap>(map: &M) -> ContainerStyle<M> {
    let container = map.div();
    let mut id = container.id();
    if id.is_empty() {
        id = format!(
            "mapbridge-map-{}",
            NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
        );
        warn!("map container has no id; assigning {id} to scope the cursor rule");
        container.set_id(&id);
    }
    container.insert_scoped_rule(&format!("#{id} .gm-style > div"))
}

impl<L, M> MapAdapter for GoogleMapsAdapter<L, M>
where
    L: MapsLibrary + 'static,
    M: GoogleMap + 'static,
{
    type Container = M::Container;

    fn map_container(&self) -> Self::Container {
        self.map.div()
    }

    fn register(&mut self, callbacks: Rc<dyn AdapterCallbacks>) {
        let container = self.map.div();
        let toggles = Rc::new(MapToggles {
            map: Rc::clone(&self.map),
        });
        let locator = self.projector.locator(self.config.coordinate_precision);
        if self
            .bridge
            .register(&container, callbacks, toggles, locator)
        {
            self.registered_on = Some(container);
        }
    }

    fn unregister(&mut self) {
        if let Some(container) = self.registered_on.take() {
            self.bridge.unregister(&container);
        }
        let data = self.map.data();
        for id in self.data_listeners.drain(..) {
            data.remove_listener(id);
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
        self.cursor.apply(cursor, || scoped_cursor_rule(map));
    }

    fn set_draggability(&self, enabled: bool) {
        self.map.set_options(&MapOptions {
            draggable: Some(enabled),
            ..MapOptions::default()
        });
    }

    fn set_double_click_to_zoom(&self, enabled: bool) {
        self.map.set_options(&MapOptions {
            disable_double_click_zoom: Some(!enabled),
            ..MapOptions::default()
        });
    }

    fn coordinate_precision(&self) -> u32 {
        self.config.coordinate_precision
    }

    fn render(&mut self, changes: &ChangeSet, styles: &SharedStyleResolver) {
        if self.data_listeners.is_empty() {
            self.listen_to_data();
        }
        if self.populated {
            for id in &changes.deleted_ids {
                self.remove(id);
            }
            for feature in &changes.updated {
                self.update(feature);
            }
            if !changes.created.is_empty() {
                self.import(changes.created.iter());
            }
        } else {
            self.import(changes.live_features());
            self.populated = true;
        }
        self.install_style(styles);
        debug!(
            "rendered {} created, {} updated, {} deleted",
            changes.created.len(),
            changes.updated.len(),
            changes.deleted_ids.len()
        );
    }

    fn clear(&mut self) {
        let owned: Vec<FeatureId> = self.index.borrow_mut().drain().map(|(id, _)| id).collect();
        let data = self.map.data();
        for id in &owned {
            if let Some(native) = data.feature_by_id(id) {
                data.remove(&native);
            }
        }
        self.populated = false;
    }
}

impl<L, M> Drop for GoogleMapsAdapter<L, M>
where
    L: MapsLibrary + 'static,
    M: GoogleMap + 'static,
{
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGoogleMap, MockMapsLibrary, london_view};
    use mapbridge_core::test_support::{
        MockContainer, RecordingCallbacks, line_feature, point_feature, square_feature,
    };
    use mapbridge_core::{FeatureStyle, PointerEventKind};
    use rstest::{fixture, rstest};

    type Adapter = GoogleMapsAdapter<MockMapsLibrary, MockGoogleMap>;

    struct Setup {
        map: Rc<MockGoogleMap>,
        adapter: Adapter,
    }

    fn build(container: MockContainer) -> Setup {
        let view = london_view();
        let map = Rc::new(MockGoogleMap::for_view(container, view));
        let lib = Rc::new(MockMapsLibrary::with_view(view));
        let adapter = GoogleMapsAdapter::new(lib, Rc::clone(&map), AdapterConfig::default())
            .expect("default config is valid");
        Setup { map, adapter }
    }

    #[fixture]
    fn setup() -> Setup {
        build(MockContainer::with_id("map-container"))
    }

    fn styles() -> SharedStyleResolver {
        Rc::new(|_: &Feature| Some(FeatureStyle::default()))
    }

    fn ids(collection: &serde_json::Value) -> Vec<String> {
        collection
            .get("features")
            .and_then(serde_json::Value::as_array)
            .map(|features| {
                features
                    .iter()
                    .filter_map(|feature| feature.get("id")?.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    fn rejects_invalid_config() {
        let view = london_view();
        let map = Rc::new(MockGoogleMap::for_view(MockContainer::default(), view));
        let lib = Rc::new(MockMapsLibrary::with_view(view));
        let config = AdapterConfig::default().with_coordinate_precision(20);
        assert!(GoogleMapsAdapter::new(lib, map, config).is_err());
    }

    #[rstest]
    fn map_container_is_the_div(setup: Setup) {
        assert_eq!(setup.adapter.map_container().id(), "map-container");
    }

    #[rstest]
    fn first_render_listens_then_imports_empty_collection(mut setup: Setup) {
        for _ in 0..3 {
            setup.adapter.render(&ChangeSet::new(), &styles());
        }
        let data = setup.map.data_layer();
        assert_eq!(
            data.listener_log(),
            vec![DataEventKind::Click, DataEventKind::MouseMove]
        );
        let imports = data.imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports.first().map(ids), Some(Vec::new()));
    }

    #[rstest]
    #[case(point_feature("point-1", -0.12, 51.5), point_feature("point-2", -0.11, 51.51))]
    #[case(
        line_feature("line-string-1", &[(-0.12, 51.5), (-0.11, 51.51)]),
        line_feature("line-string-2", &[(-0.13, 51.5), (-0.1, 51.49)])
    )]
    #[case(
        square_feature("square-1", -0.12, 51.5, 0.01),
        square_feature("square-2", -0.1, 51.52, 0.01)
    )]
    fn adds_and_deletes(mut setup: Setup, #[case] first: Feature, #[case] second: Feature) {
        setup.adapter.render(
            &ChangeSet::new().with_created(vec![first.clone(), second.clone()]),
            &styles(),
        );
        setup.adapter.render(
            &ChangeSet::new()
                .with_unchanged(vec![first.clone()])
                .with_deleted([second.id.clone()]),
            &styles(),
        );
        let data = setup.map.data_layer();
        assert_eq!(data.removed(), vec![second.id.clone()]);
        assert_eq!(data.native_ids(), vec![first.id.clone()]);
        assert_eq!(
            data.imports().first().map(ids),
            Some(vec![first.id.to_string(), second.id.to_string()])
        );
    }

    #[rstest]
    fn adds_on_successive_renders(mut setup: Setup) {
        setup.adapter.render(&ChangeSet::new(), &styles());
        let feature = point_feature("point-1", -0.12, 51.5);
        setup
            .adapter
            .render(&ChangeSet::new().with_created(vec![feature]), &styles());
        let imports = setup.map.data_layer().imports();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports.last().map(ids), Some(vec!["point-1".to_owned()]));
    }

    #[rstest]
    fn updates_in_place(mut setup: Setup) {
        let original = point_feature("point-1", -0.12, 51.5).with_property("selected", true);
        setup
            .adapter
            .render(&ChangeSet::new().with_created(vec![original]), &styles());
        let moved = point_feature("point-1", -0.1, 51.4).with_property("midpoint", 2);
        setup
            .adapter
            .render(&ChangeSet::new().with_updated(vec![moved]), &styles());

        let data = setup.map.data_layer();
        assert_eq!(data.imports().len(), 1);
        let native = data
            .feature(&FeatureId::from("point-1"))
            .expect("feature stays in the layer");
        assert_eq!(
            native.geometry(),
            Some(DataGeometry::Point(LngLat::new(-0.1, 51.4)))
        );
        assert_eq!(native.property("selected"), None);
        assert_eq!(native.property("midpoint"), Some(serde_json::json!(2)));
        assert_eq!(native.property("mode"), Some(serde_json::json!("point")));
    }

    #[rstest]
    fn skips_features_missing_from_the_layer(mut setup: Setup) {
        let feature = point_feature("point-1", -0.12, 51.5);
        setup
            .adapter
            .render(&ChangeSet::new().with_created(vec![feature.clone()]), &styles());
        setup.map.data_layer().forget(&feature.id);
        setup
            .adapter
            .render(&ChangeSet::new().with_updated(vec![feature.clone()]), &styles());
        setup
            .adapter
            .render(&ChangeSet::new().with_deleted([feature.id.clone()]), &styles());
        assert!(setup.map.data_layer().removed().is_empty());
    }

    #[rstest]
    fn ignores_updates_for_foreign_ids(mut setup: Setup) {
        setup.adapter.render(&ChangeSet::new(), &styles());
        setup.adapter.render(
            &ChangeSet::new().with_updated(vec![point_feature("stranger", 0.0, 0.0)]),
            &styles(),
        );
        assert_eq!(setup.map.data_layer().lookups(), 0);
    }

    #[rstest]
    fn style_follows_resolver(mut setup: Setup) {
        let resolver: SharedStyleResolver = Rc::new(|feature: &Feature| {
            (feature.id.as_str() != "hidden").then(|| FeatureStyle {
                z_index: 7,
                ..FeatureStyle::default()
            })
        });
        setup.adapter.render(
            &ChangeSet::new().with_created(vec![
                point_feature("shown", -0.12, 51.5),
                point_feature("hidden", -0.11, 51.5),
            ]),
            &resolver,
        );
        let styled = setup.map.data_layer().styles();
        let shown = styled
            .iter()
            .find(|(id, _)| id.as_str() == "shown")
            .map(|(_, style)| style.clone())
            .expect("style for shown feature");
        assert!(shown.visible);
        assert_eq!(shown.z_index, 7);
        assert!(shown.icon.is_some());
        assert!(
            styled
                .iter()
                .any(|(id, style)| id.as_str() == "hidden" && !style.visible)
        );
    }

    #[rstest]
    fn clear_without_features_is_safe(mut setup: Setup) {
        setup.adapter.clear();
        assert!(setup.map.data_layer().removed().is_empty());
    }

    #[rstest]
    fn clear_removes_owned_features_and_repopulates(mut setup: Setup) {
        let feature = point_feature("point-1", -0.12, 51.5);
        setup
            .adapter
            .render(&ChangeSet::new().with_created(vec![feature.clone()]), &styles());
        setup.adapter.clear();
        assert!(setup.map.data_layer().native_ids().is_empty());
        assert!(setup.adapter.owned_ids().is_empty());

        setup
            .adapter
            .render(&ChangeSet::new().with_unchanged(vec![feature]), &styles());
        assert_eq!(setup.map.data_layer().imports().len(), 2);
        assert_eq!(setup.adapter.owned_ids(), vec![FeatureId::from("point-1")]);
    }

    #[rstest]
    fn unset_cursor_on_fresh_adapter_touches_nothing(mut setup: Setup) {
        setup.adapter.set_cursor(CursorState::Unset);
        assert_eq!(setup.map.div_calls(), 0);
        assert!(setup.map.container().rules().is_empty());
    }

    #[rstest]
    fn pointer_cursor_creates_one_scoped_rule(mut setup: Setup) {
        for _ in 0..3 {
            setup.adapter.set_cursor(CursorState::Pointer);
        }
        assert_eq!(setup.map.div_calls(), 1);
        let rules = setup.map.container().rules();
        assert_eq!(rules.len(), 1);
        let (selector, style) = rules.first().expect("one rule");
        assert!(selector.starts_with("#map-container"));
        assert_eq!(style.property("cursor").as_deref(), Some("pointer"));
        assert_eq!(style.priority("cursor"), Some(StylePriority::Important));
        assert_eq!(style.writes(), 1);
    }

    #[rstest]
    fn unset_after_pointer_removes_property(mut setup: Setup) {
        setup.adapter.set_cursor(CursorState::Pointer);
        setup.adapter.set_cursor(CursorState::Unset);
        let rules = setup.map.container().rules();
        assert_eq!(rules.len(), 1);
        let (_, style) = rules.first().expect("rule is kept");
        assert_eq!(style.property("cursor"), None);
    }

    #[rstest]
    fn container_without_id_gets_one() {
        let mut setup = build(MockContainer::default());
        setup.adapter.set_cursor(CursorState::Crosshair);
        let id = setup.map.container().id();
        assert!(id.starts_with("mapbridge-map-"));
        let rules = setup.map.container().rules();
        let (selector, _) = rules.first().expect("one rule");
        assert!(selector.starts_with(&format!("#{id}")));
    }

    #[rstest]
    fn register_wires_pointer_listeners_once(mut setup: Setup) {
        let callbacks = Rc::new(RecordingCallbacks::default());
        setup.adapter.register(callbacks.clone());
        setup.adapter.register(callbacks);
        let container = setup.map.container();
        assert_eq!(container.listeners_added(), 3);

        setup.adapter.unregister();
        assert_eq!(container.listener_count(), 0);
        setup.adapter.unregister();
        assert_eq!(container.listeners_removed(), 3);
    }

    #[rstest]
    fn pointer_input_reaches_callbacks(mut setup: Setup) {
        let view = london_view();
        let callbacks = Rc::new(RecordingCallbacks::default());
        setup.adapter.register(callbacks.clone());
        let container = setup.map.container();
        let raw = RawPointerEvent::primary(view.width / 2.0, view.height / 2.0);
        container.dispatch(PointerEventKind::Down, &raw);
        container.dispatch(PointerEventKind::Up, &raw);
        assert_eq!(callbacks.kinds(), vec!["click"]);
    }

    #[rstest]
    fn input_over_a_feature_is_reported_once(mut setup: Setup) {
        let view = london_view();
        let callbacks = Rc::new(RecordingCallbacks::default());
        setup.adapter.register(callbacks.clone());
        setup.adapter.render(
            &ChangeSet::new().with_created(vec![point_feature(
                "point-1",
                view.center.lng,
                view.center.lat,
            )]),
            &styles(),
        );
        let container = setup.map.container();
        let data = setup.map.data_layer();
        let raw = RawPointerEvent::primary(view.width / 2.0, view.height / 2.0);
        let over_feature = DataMouseEvent {
            lat_lng: view.center,
            client_x: raw.client_x,
            client_y: raw.client_y,
        };

        container.dispatch(PointerEventKind::Move, &raw);
        data.dispatch(DataEventKind::MouseMove, &over_feature);
        container.dispatch(PointerEventKind::Down, &raw);
        container.dispatch(PointerEventKind::Up, &raw);
        data.dispatch(DataEventKind::Click, &over_feature);

        assert_eq!(callbacks.kinds(), vec!["mouse_move", "click"]);
    }

    #[rstest]
    fn data_layer_moves_do_not_extend_a_drag(mut setup: Setup) {
        let view = london_view();
        let callbacks = Rc::new(RecordingCallbacks::default());
        setup.adapter.register(callbacks.clone());
        setup.adapter.render(&ChangeSet::new(), &styles());
        let container = setup.map.container();
        let (x, y) = (view.width / 2.0, view.height / 2.0);
        container.dispatch(PointerEventKind::Down, &RawPointerEvent::primary(x, y));
        container.dispatch(PointerEventKind::Move, &RawPointerEvent::primary(x + 10.0, y));
        setup.map.data_layer().dispatch(
            DataEventKind::MouseMove,
            &DataMouseEvent {
                lat_lng: view.center,
                client_x: x + 12.0,
                client_y: y,
            },
        );
        container.dispatch(PointerEventKind::Up, &RawPointerEvent::primary(x + 10.0, y));
        assert_eq!(callbacks.kinds(), vec!["drag_start", "drag_end"]);
    }

    #[rstest]
    fn unregister_removes_data_listeners(mut setup: Setup) {
        setup.adapter.render(&ChangeSet::new(), &styles());
        setup.adapter.unregister();
        assert_eq!(setup.map.data_layer().listener_count(), 0);
    }

    #[rstest]
    fn toggles_map_options(setup: Setup) {
        setup.adapter.set_draggability(false);
        setup.adapter.set_double_click_to_zoom(false);
        assert_eq!(
            setup.map.options(),
            vec![
                MapOptions {
                    draggable: Some(false),
                    disable_double_click_zoom: None,
                },
                MapOptions {
                    draggable: None,
                    disable_double_click_zoom: Some(true),
                },
            ]
        );
    }
}
