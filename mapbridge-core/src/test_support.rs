//! Test doubles for the host document and for adapter callers.
//!
//! These types record every call so tests can assert on side effects. They
//! are exported for the engine crates' tests and benchmarks and are not part
//! of the supported API.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::rc::Rc;

use geo::{Geometry, LineString, Point, Polygon};

use crate::{
    AdapterCallbacks, ClientRect, Feature, ListenerId, LngLat, Locator, MapContainer,
    MapDraggability, PixelPoint, PointerEvent, PointerEventKind, PointerHandler, RawPointerEvent,
    StyleDeclaration, StylePriority,
};

#[derive(Debug, Default)]
struct StyleRecord {
    properties: BTreeMap<String, (String, StylePriority)>,
    writes: usize,
}

/// Declaration block that remembers what was written to it.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockStyle {
    inner: Rc<RefCell<StyleRecord>>,
}

impl MockStyle {
    /// Current value of `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .properties
            .get(name)
            .map(|(value, _)| value.clone())
    }

    /// Priority `name` was written with.
    #[must_use]
    pub fn priority(&self, name: &str) -> Option<StylePriority> {
        self.inner
            .borrow()
            .properties
            .get(name)
            .map(|&(_, priority)| priority)
    }

    /// Number of set and remove calls.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl StyleDeclaration for MockStyle {
    fn set_property(&self, name: &str, value: &str, priority: StylePriority) {
        let mut record = self.inner.borrow_mut();
        record
            .properties
            .insert(name.to_owned(), (value.to_owned(), priority));
        record.writes += 1;
    }

    fn remove_property(&self, name: &str) {
        let mut record = self.inner.borrow_mut();
        record.properties.remove(name);
        record.writes += 1;
    }
}

type SharedHandler = Rc<RefCell<PointerHandler>>;

#[derive(Default)]
struct ContainerState {
    id: String,
    rect: ClientRect,
    inline: MockStyle,
    rules: Vec<(String, MockStyle)>,
    listeners: Vec<(ListenerId, PointerEventKind, SharedHandler)>,
    next_listener: u64,
    added: usize,
    removed: usize,
}

/// In-memory container element.
///
/// Clones share state, like handles to one document node.
#[derive(Clone, Default)]
pub struct MockContainer {
    inner: Rc<RefCell<ContainerState>>,
}

impl MockContainer {
    /// A container with the given `id` attribute.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        let container = Self::default();
        container.set_id(id);
        container
    }

    /// Replace the bounding rectangle.
    #[must_use]
    pub fn with_rect(self, rect: ClientRect) -> Self {
        self.inner.borrow_mut().rect = rect;
        self
    }

    /// Stylesheet rules inserted so far, in order.
    #[must_use]
    pub fn rules(&self) -> Vec<(String, MockStyle)> {
        self.inner.borrow().rules.clone()
    }

    /// The inline style block.
    #[must_use]
    pub fn inline(&self) -> MockStyle {
        self.inner.borrow().inline.clone()
    }

    /// Listeners currently attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Total listeners ever attached.
    #[must_use]
    pub fn listeners_added(&self) -> usize {
        self.inner.borrow().added
    }

    /// Total listeners detached.
    #[must_use]
    pub fn listeners_removed(&self) -> usize {
        self.inner.borrow().removed
    }

    /// Deliver `raw` to every listener for `kind`, in attach order.
    ///
    /// Handlers may add or remove listeners while running.
    pub fn dispatch(&self, kind: PointerEventKind, raw: &RawPointerEvent) {
        let handlers: Vec<SharedHandler> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, listened, _)| *listened == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            let mut call = handler.borrow_mut();
            (&mut **call)(raw);
        }
    }
}

impl MapContainer for MockContainer {
    type Style = MockStyle;

    fn id(&self) -> String {
        self.inner.borrow().id.clone()
    }

    fn set_id(&self, id: &str) {
        id.clone_into(&mut self.inner.borrow_mut().id);
    }

    fn bounding_client_rect(&self) -> ClientRect {
        self.inner.borrow().rect
    }

    fn inline_style(&self) -> Self::Style {
        self.inline()
    }

    fn insert_scoped_rule(&self, selector: &str) -> Self::Style {
        let style = MockStyle::default();
        self.inner
            .borrow_mut()
            .rules
            .push((selector.to_owned(), style.clone()));
        style
    }

    fn add_pointer_listener(&self, kind: PointerEventKind, handler: PointerHandler) -> ListenerId {
        let mut state = self.inner.borrow_mut();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state
            .listeners
            .push((id, kind, Rc::new(RefCell::new(handler))));
        state.added += 1;
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let mut state = self.inner.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener, _, _)| *listener != id);
        if state.listeners.len() < before {
            state.removed += 1;
        }
    }
}

/// One callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackRecord {
    /// `on_click`
    Click(PointerEvent),
    /// `on_mouse_move`
    MouseMove(PointerEvent),
    /// `on_drag_start`
    DragStart(PointerEvent),
    /// `on_drag`
    Drag(PointerEvent),
    /// `on_drag_end`
    DragEnd(PointerEvent),
}

impl CallbackRecord {
    /// Snake-case name of the callback.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Click(_) => "click",
            Self::MouseMove(_) => "mouse_move",
            Self::DragStart(_) => "drag_start",
            Self::Drag(_) => "drag",
            Self::DragEnd(_) => "drag_end",
        }
    }
}

/// Callbacks that record what they receive.
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    records: RefCell<Vec<CallbackRecord>>,
}

impl RecordingCallbacks {
    /// Every invocation so far.
    #[must_use]
    pub fn records(&self) -> Vec<CallbackRecord> {
        self.records.borrow().clone()
    }

    /// Names of the callbacks invoked so far.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.records.borrow().iter().map(CallbackRecord::kind).collect()
    }

    fn push(&self, record: CallbackRecord) {
        self.records.borrow_mut().push(record);
    }
}

impl AdapterCallbacks for RecordingCallbacks {
    fn on_click(&self, event: &PointerEvent) {
        self.push(CallbackRecord::Click(*event));
    }

    fn on_mouse_move(&self, event: &PointerEvent) {
        self.push(CallbackRecord::MouseMove(*event));
    }

    fn on_drag_start(&self, event: &PointerEvent, _map: &dyn MapDraggability) {
        self.push(CallbackRecord::DragStart(*event));
    }

    fn on_drag(&self, event: &PointerEvent, _map: &dyn MapDraggability) {
        self.push(CallbackRecord::Drag(*event));
    }

    fn on_drag_end(&self, event: &PointerEvent, _map: &dyn MapDraggability) {
        self.push(CallbackRecord::DragEnd(*event));
    }
}

/// Draggability switch that records every toggle.
#[derive(Debug, Default)]
pub struct RecordingDraggability {
    calls: RefCell<Vec<bool>>,
}

impl RecordingDraggability {
    /// Values passed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<bool> {
        self.calls.borrow().clone()
    }
}

impl MapDraggability for RecordingDraggability {
    fn set_draggability(&self, enabled: bool) {
        self.calls.borrow_mut().push(enabled);
    }
}

/// Locator treating client pixels as both container pixels and degrees.
#[must_use]
pub fn offset_locator() -> Locator {
    Rc::new(|raw: &RawPointerEvent| {
        Some(PointerEvent::new(
            LngLat::new(raw.client_x, raw.client_y),
            PixelPoint::new(raw.client_x, raw.client_y),
            raw.button,
            9,
        ))
    })
}

/// Spherical Web Mercator viewport, as slippy-map engines use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    /// Geographic centre of the viewport.
    pub center: LngLat,
    /// Zoom level; the world is `256 * 2^zoom` pixels wide.
    pub zoom: f64,
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
}

impl WebMercator {
    /// Largest latitude Web Mercator can represent.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

    fn world_size(&self) -> f64 {
        256.0 * self.zoom.exp2()
    }

    fn world(&self, position: LngLat) -> PixelPoint {
        let size = self.world_size();
        let lat = position.lat.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let sin = lat.to_radians().sin();
        PixelPoint::new(
            (position.lng + 180.0) / 360.0 * size,
            (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size,
        )
    }

    /// Container pixels for `position`.
    #[must_use]
    pub fn project(&self, position: LngLat) -> PixelPoint {
        let origin = self.world(self.center);
        let point = self.world(position);
        PixelPoint::new(
            point.x - origin.x + self.width / 2.0,
            point.y - origin.y + self.height / 2.0,
        )
    }

    /// Position under container pixel `pixel`.
    #[must_use]
    pub fn unproject(&self, pixel: PixelPoint) -> LngLat {
        let size = self.world_size();
        let origin = self.world(self.center);
        let x = pixel.x - self.width / 2.0 + origin.x;
        let y = pixel.y - self.height / 2.0 + origin.y;
        let n = PI - 2.0 * PI * y / size;
        LngLat::new(x / size * 360.0 - 180.0, n.sinh().atan().to_degrees())
    }

    /// South-west and north-east corners of the viewport.
    #[must_use]
    pub fn bounds(&self) -> (LngLat, LngLat) {
        (
            self.unproject(PixelPoint::new(0.0, self.height)),
            self.unproject(PixelPoint::new(self.width, 0.0)),
        )
    }
}

/// A point feature drawn by the `point` mode.
#[must_use]
pub fn point_feature(id: &str, lng: f64, lat: f64) -> Feature {
    Feature::new(id, Geometry::Point(Point::new(lng, lat))).with_property("mode", "point")
}

/// A line string feature drawn by the `linestring` mode.
#[must_use]
pub fn line_feature(id: &str, coords: &[(f64, f64)]) -> Feature {
    Feature::new(id, Geometry::LineString(LineString::from(coords.to_vec())))
        .with_property("mode", "linestring")
}

/// An axis-aligned square polygon drawn by the `polygon` mode.
#[must_use]
pub fn square_feature(id: &str, lng: f64, lat: f64, size: f64) -> Feature {
    let ring = LineString::from(vec![
        (lng, lat),
        (lng + size, lat),
        (lng + size, lat + size),
        (lng, lat + size),
        (lng, lat),
    ]);
    Feature::new(id, Geometry::Polygon(Polygon::new(ring, Vec::new())))
        .with_property("mode", "polygon")
}
