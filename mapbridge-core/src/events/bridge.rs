//! Pointer listener registration and click/drag classification.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use super::{AdapterCallbacks, Locator, MapDraggability, PointerEvent, RawPointerEvent};
use crate::{AdapterConfig, ListenerId, MapContainer, PixelPoint, PointerEventKind};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    NotDragging,
    PreDragging { origin: PixelPoint },
    Dragging,
}

/// Routes located pointer input to the registered callbacks.
///
/// A press records where the pointer went down. Movement past the configured
/// distance while pressed becomes a drag; a release either ends the drag or,
/// when none started, reports a click.
pub struct Dispatcher {
    callbacks: Rc<dyn AdapterCallbacks>,
    draggability: Rc<dyn MapDraggability>,
    locate: Locator,
    min_pixel_drag_distance: f64,
    state: Cell<DragState>,
}

impl Dispatcher {
    /// Create a dispatcher in the idle state.
    #[must_use]
    pub fn new(
        callbacks: Rc<dyn AdapterCallbacks>,
        draggability: Rc<dyn MapDraggability>,
        locate: Locator,
        min_pixel_drag_distance: f64,
    ) -> Self {
        Self {
            callbacks,
            draggability,
            locate,
            min_pixel_drag_distance,
            state: Cell::new(DragState::NotDragging),
        }
    }

    /// `true` between a drag start and the matching release.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.get() == DragState::Dragging
    }

    /// Handle a raw `pointerdown`.
    pub fn pointer_down(&self, raw: &RawPointerEvent) {
        if !raw.is_primary {
            return;
        }
        if let Some(event) = (self.locate)(raw) {
            self.press(&event);
        }
    }

    /// Handle a raw `pointermove`.
    pub fn pointer_move(&self, raw: &RawPointerEvent) {
        if !raw.is_primary {
            return;
        }
        if let Some(event) = (self.locate)(raw) {
            self.motion(&event);
        }
    }

    /// Handle a raw `pointerup`.
    ///
    /// The drag state is reset even when the pointer cannot be located, so a
    /// release outside the map never leaves a drag hanging.
    pub fn pointer_up(&self, raw: &RawPointerEvent) {
        if !raw.is_primary {
            return;
        }
        let event = (self.locate)(raw);
        self.release(event.as_ref());
    }

    /// Record a press at a located position.
    pub fn press(&self, event: &PointerEvent) {
        self.state.set(DragState::PreDragging {
            origin: event.container_point(),
        });
    }

    /// Movement at a located position.
    pub fn motion(&self, event: &PointerEvent) {
        match self.state.get() {
            DragState::NotDragging => self.callbacks.on_mouse_move(event),
            DragState::PreDragging { origin } => {
                if origin.distance_to(event.container_point()) < self.min_pixel_drag_distance {
                    return;
                }
                self.state.set(DragState::Dragging);
                self.callbacks
                    .on_drag_start(event, self.draggability.as_ref());
            }
            DragState::Dragging => self.callbacks.on_drag(event, self.draggability.as_ref()),
        }
    }

    /// Release, optionally at a located position.
    pub fn release(&self, event: Option<&PointerEvent>) {
        let previous = self.state.replace(DragState::NotDragging);
        if let Some(located) = event {
            if previous == DragState::Dragging {
                self.callbacks
                    .on_drag_end(located, self.draggability.as_ref());
            } else {
                self.callbacks.on_click(located);
            }
        }
        self.draggability.set_draggability(true);
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("min_pixel_drag_distance", &self.min_pixel_drag_distance)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

struct Session {
    listeners: Vec<ListenerId>,
}

/// Owns the pointer listeners an adapter attaches to its container.
///
/// Listeners are attached once per registration. A second
/// [`EventBridge::register`] while registered changes nothing.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use mapbridge_core::{AdapterConfig, EventBridge, PointerEventKind, RawPointerEvent};
/// use mapbridge_core::test_support::{
///     MockContainer, RecordingCallbacks, RecordingDraggability, offset_locator,
/// };
///
/// let container = MockContainer::default();
/// let callbacks = Rc::new(RecordingCallbacks::default());
/// let mut bridge = EventBridge::new(&AdapterConfig::default());
/// assert!(bridge.register(
///     &container,
///     callbacks.clone(),
///     Rc::new(RecordingDraggability::default()),
///     offset_locator(),
/// ));
///
/// container.dispatch(PointerEventKind::Down, &RawPointerEvent::primary(5.0, 5.0));
/// container.dispatch(PointerEventKind::Up, &RawPointerEvent::primary(5.0, 5.0));
/// assert_eq!(callbacks.kinds(), vec!["click"]);
/// ```
pub struct EventBridge {
    min_pixel_drag_distance: f64,
    session: Option<Session>,
}

impl EventBridge {
    /// A bridge with nothing registered.
    #[must_use]
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            min_pixel_drag_distance: config.min_pixel_drag_distance,
            session: None,
        }
    }

    /// `true` while listeners are attached.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.session.is_some()
    }

    /// Attach `pointerdown`, `pointermove` and `pointerup` listeners to
    /// `container`. Returns `false` without touching the container when
    /// already registered.
    pub fn register<C: MapContainer>(
        &mut self,
        container: &C,
        callbacks: Rc<dyn AdapterCallbacks>,
        draggability: Rc<dyn MapDraggability>,
        locate: Locator,
    ) -> bool {
        if self.session.is_some() {
            debug!("pointer listeners already registered; ignoring");
            return false;
        }
        let dispatcher = Rc::new(Dispatcher::new(
            callbacks,
            draggability,
            locate,
            self.min_pixel_drag_distance,
        ));
        let listeners = [
            PointerEventKind::Down,
            PointerEventKind::Move,
            PointerEventKind::Up,
        ]
        .into_iter()
        .map(|kind| {
            let target = Rc::clone(&dispatcher);
            container.add_pointer_listener(
                kind,
                Box::new(move |raw: &RawPointerEvent| match kind {
                    PointerEventKind::Down => target.pointer_down(raw),
                    PointerEventKind::Move => target.pointer_move(raw),
                    PointerEventKind::Up => target.pointer_up(raw),
                }),
            )
        })
        .collect();
        debug!("registered pointer listeners");
        self.session = Some(Session { listeners });
        true
    }

    /// Detach every listener added by [`EventBridge::register`]. Returns
    /// `false` when nothing was registered.
    pub fn unregister<C: MapContainer>(&mut self, container: &C) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        for id in session.listeners {
            container.remove_listener(id);
        }
        debug!("removed pointer listeners");
        true
    }
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("min_pixel_drag_distance", &self.min_pixel_drag_distance)
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}
