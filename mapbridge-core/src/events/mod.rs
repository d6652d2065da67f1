//! Pointer events and the callbacks adapters deliver them to.

mod bridge;

use std::rc::Rc;

pub use bridge::{Dispatcher, EventBridge};

use crate::{LngLat, PixelPoint};

/// Mouse button that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left button, touch contact or pen tip.
    Primary,
    /// Right button.
    Secondary,
    /// No button pressed, or one the bridge does not distinguish.
    #[default]
    Neither,
}

/// Pointer input as the host delivers it, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPointerEvent {
    /// Horizontal viewport offset.
    pub client_x: f64,
    /// Vertical viewport offset.
    pub client_y: f64,
    /// Button that changed state.
    pub button: PointerButton,
    /// `false` for secondary touch contacts.
    pub is_primary: bool,
}

impl RawPointerEvent {
    /// A primary pointer event at the given viewport offset.
    #[must_use]
    pub const fn primary(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            button: PointerButton::Primary,
            is_primary: true,
        }
    }
}

/// Pointer input in map terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Longitude, rounded to the configured precision.
    pub lng: f64,
    /// Latitude, rounded to the configured precision.
    pub lat: f64,
    /// Horizontal offset inside the container.
    pub container_x: f64,
    /// Vertical offset inside the container.
    pub container_y: f64,
    /// Button that changed state.
    pub button: PointerButton,
}

impl PointerEvent {
    /// Build an event from a located position, rounding it to `precision`
    /// decimal places.
    #[must_use]
    pub fn new(position: LngLat, container: PixelPoint, button: PointerButton, precision: u32) -> Self {
        let LngLat { lng, lat } = position.limit_precision(precision);
        Self {
            lng,
            lat,
            container_x: container.x,
            container_y: container.y,
            button,
        }
    }

    /// Position inside the container.
    #[must_use]
    pub const fn container_point(&self) -> PixelPoint {
        PixelPoint::new(self.container_x, self.container_y)
    }
}

/// Toggles engine panning while a drawing mode drags features.
pub trait MapDraggability {
    /// Enable or disable map panning.
    fn set_draggability(&self, enabled: bool);
}

/// Callbacks a drawing layer registers with an adapter.
///
/// Drag callbacks receive the adapter's draggability switch so a mode can
/// stop the map panning while it moves a feature.
pub trait AdapterCallbacks {
    /// A press and release without meaningful movement.
    fn on_click(&self, event: &PointerEvent);

    /// Movement with no drag in progress.
    fn on_mouse_move(&self, event: &PointerEvent);

    /// A pressed pointer moved past the drag threshold.
    fn on_drag_start(&self, event: &PointerEvent, map: &dyn MapDraggability);

    /// Movement during a drag.
    fn on_drag(&self, event: &PointerEvent, map: &dyn MapDraggability);

    /// Release after a drag.
    fn on_drag_end(&self, event: &PointerEvent, map: &dyn MapDraggability);
}

/// Resolves raw input to a map event; `None` when the engine cannot locate
/// the pointer yet.
pub type Locator = Rc<dyn Fn(&RawPointerEvent) -> Option<PointerEvent>>;
