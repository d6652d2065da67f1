//! The contract every engine binding implements.

use std::rc::Rc;

use crate::{
    AdapterCallbacks, ChangeSet, CursorState, LngLat, MapContainer, PixelPoint, ProjectionError,
    RawPointerEvent, SharedStyleResolver,
};

/// One map engine seen through a uniform, synchronous interface.
///
/// An adapter is bound to a single live map for its whole life. Callers
/// register once, then call [`MapAdapter::render`] after every store change
/// and project coordinates on demand. All methods run on the UI thread.
///
/// Projection methods fail fast while the engine is still initialising; the
/// pointer helper [`MapAdapter::lng_lat_from_event`] reports the same
/// condition as `None` because it runs on every pointer move.
pub trait MapAdapter {
    /// The engine's root element type.
    type Container: MapContainer;

    /// The element the engine renders into. Has no side effects and works
    /// before registration.
    fn map_container(&self) -> Self::Container;

    /// Wire the container's pointer input to `callbacks`.
    ///
    /// Calling this again while registered does nothing.
    fn register(&mut self, callbacks: Rc<dyn AdapterCallbacks>);

    /// Remove every listener added by [`MapAdapter::register`]. Safe to call
    /// when never registered.
    fn unregister(&mut self);

    /// Geographic position to container pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when the engine cannot project yet or its
    /// conversion yields nothing.
    fn project(&self, lng: f64, lat: f64) -> Result<PixelPoint, ProjectionError>;

    /// Container pixels to geographic position.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] under the same conditions as
    /// [`MapAdapter::project`].
    fn unproject(&self, x: f64, y: f64) -> Result<LngLat, ProjectionError>;

    /// Geographic position under a raw pointer event, or `None` when the
    /// engine cannot locate it.
    fn lng_lat_from_event(&self, event: &RawPointerEvent) -> Option<LngLat>;

    /// Show `cursor` over the map. Repeating the current cursor writes
    /// nothing.
    fn set_cursor(&mut self, cursor: CursorState);

    /// Allow or prevent map panning.
    fn set_draggability(&self, enabled: bool);

    /// Allow or prevent double-click zoom.
    fn set_double_click_to_zoom(&self, enabled: bool);

    /// Decimal places kept on pointer event coordinates.
    fn coordinate_precision(&self) -> u32;

    /// Bring the engine's features in line with `changes`, styling each with
    /// `styles`.
    fn render(&mut self, changes: &ChangeSet, styles: &SharedStyleResolver);

    /// Remove every feature this adapter added. Does nothing when there are
    /// none.
    fn clear(&mut self);
}
