//! Behavioural coverage for OpenLayers layer rendering.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mapbridge_core::test_support::{MockContainer, point_feature};
use mapbridge_core::{
    AdapterConfig, ChangeSet, Feature, FeatureId, FeatureStyle, MapAdapter, SharedStyleResolver,
};
use mapbridge_openlayers::OpenLayersAdapter;
use mapbridge_openlayers::test_support::{MockLayer, MockOlLibrary, MockOlMap, paris_view};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

type Adapter = OpenLayersAdapter<MockOlLibrary, MockOlMap>;

/// Library and map doubles and the adapter bound to them.
pub struct World {
    lib: Rc<MockOlLibrary>,
    map: Rc<MockOlMap>,
    adapter: RefCell<Option<Adapter>>,
    resolutions: Rc<Cell<usize>>,
    styles: SharedStyleResolver,
}

impl World {
    fn render(&self, changes: &ChangeSet) {
        let mut adapter = self.adapter.borrow_mut();
        let Some(adapter) = adapter.as_mut() else {
            panic!("adapter must be created first");
        };
        adapter.render(changes, &self.styles);
    }

    fn only_layer(&self) -> MockLayer {
        let layers = self.map.layers();
        assert_eq!(layers.len(), 1, "expected exactly one layer");
        layers
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("map should hold a layer"))
    }
}

fn point_1() -> Feature {
    point_feature("point-1", 2.35, 48.85)
}

fn point_2() -> Feature {
    point_feature("point-2", 2.36, 48.86)
}

/// Paris map that has rendered a frame, with no adapter yet.
#[fixture]
pub fn world() -> World {
    let resolutions = Rc::new(Cell::new(0_usize));
    let counter = Rc::clone(&resolutions);
    World {
        lib: Rc::new(MockOlLibrary::default()),
        map: Rc::new(MockOlMap::rendered(
            MockContainer::with_id("ol-viewport"),
            paris_view(),
        )),
        adapter: RefCell::new(None),
        resolutions,
        styles: Rc::new(move |_: &Feature| {
            counter.set(counter.get() + 1);
            Some(FeatureStyle::default())
        }),
    }
}

#[given("an OpenLayers adapter over a rendered map")]
fn adapter_over_rendered_map(world: &World) {
    let adapter = OpenLayersAdapter::new(
        Rc::clone(&world.lib),
        Rc::clone(&world.map),
        AdapterConfig::default(),
    )
    .unwrap_or_else(|err| panic!("default config should be valid: {err}"));
    *world.adapter.borrow_mut() = Some(adapter);
}

#[when("point-1 and point-2 are created")]
fn create_both(world: &World) {
    world.render(&ChangeSet::new().with_created(vec![point_1(), point_2()]));
}

#[when("point-2 is deleted while point-1 is unchanged")]
fn delete_second(world: &World) {
    world.render(
        &ChangeSet::new()
            .with_unchanged(vec![point_1()])
            .with_deleted(["point-2"]),
    );
}

#[when("the layer is drawn")]
fn draw_layer(world: &World) {
    let styled = world.only_layer().styles();
    assert!(styled.iter().all(|(_, style)| style.is_some()));
}

#[then("the reader received point-1 and point-2 in EPSG:3857")]
fn reader_received_both(world: &World) {
    let reads = world.lib.reads();
    let Some((collection, projection)) = reads.first() else {
        panic!("readFeatures should have been called");
    };
    assert_eq!(projection, "EPSG:3857");
    let ids: Vec<&str> = collection
        .get("features")
        .and_then(Value::as_array)
        .map(|features| {
            features
                .iter()
                .filter_map(|feature| feature.get("id")?.as_str())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(ids, vec!["point-1", "point-2"]);
}

#[then("the map holds one layer with point-1 and point-2")]
fn layer_has_both(world: &World) {
    assert_eq!(
        world.only_layer().feature_ids(),
        vec![FeatureId::from("point-1"), FeatureId::from("point-2")]
    );
}

#[then("the first layer was removed")]
fn first_layer_removed(world: &World) {
    assert_eq!(world.map.removed_layers(), vec![1]);
}

#[then("the map holds one layer with only point-1")]
fn layer_has_first(world: &World) {
    assert_eq!(
        world.only_layer().feature_ids(),
        vec![FeatureId::from("point-1")]
    );
}

#[then("the resolver was consulted once per feature")]
fn resolver_once_per_feature(world: &World) {
    assert_eq!(world.resolutions.get(), 2);
}

#[scenario(path = "tests/features/render.feature", index = 0)]
fn render_creates_layer(#[from(world)] _world: World) {}

#[scenario(path = "tests/features/render.feature", index = 1)]
fn render_swaps_layer(#[from(world)] _world: World) {}

#[scenario(path = "tests/features/render.feature", index = 2)]
fn style_delegates_per_feature(#[from(world)] _world: World) {}
