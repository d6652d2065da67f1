//! Coordinate conversion through the map's overlay projection.

use std::rc::Rc;

use mapbridge_core::{
    LngLat, Locator, MapContainer, MissingProjection, PixelPoint, PointerEvent, ProjectionError,
    RawPointerEvent,
};

use crate::host::{GoogleMap, MapCanvasProjection, MapsLibrary, OverlayView};

/// Projects between geography and container pixels for one map.
///
/// Google Maps exposes its projection only through an `OverlayView` attached
/// to the map, and only after the map has drawn. The overlay is created once;
/// its projection is queried on every call.
pub struct Projector<L: MapsLibrary, M> {
    lib: Rc<L>,
    map: Rc<M>,
    overlay: Rc<L::Overlay>,
}

impl<L: MapsLibrary, M> Clone for Projector<L, M> {
    fn clone(&self) -> Self {
        Self {
            lib: Rc::clone(&self.lib),
            map: Rc::clone(&self.map),
            overlay: Rc::clone(&self.overlay),
        }
    }
}

impl<L: MapsLibrary, M: GoogleMap> Projector<L, M> {
    /// Attach an overlay to `map`.
    #[must_use]
    pub fn new(lib: Rc<L>, map: Rc<M>) -> Self {
        let overlay = Rc::new(lib.overlay_view(map.as_ref()));
        Self { lib, map, overlay }
    }

    /// Geographic position to container pixels.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::Unavailable`] when the map has no bounds or no
    /// projection yet; [`ProjectionError::ProjectFailed`] when the conversion
    /// returns nothing.
    pub fn project(&self, lng: f64, lat: f64) -> Result<PixelPoint, ProjectionError> {
        if self.map.bounds().is_none() {
            return Err(ProjectionError::Unavailable(MissingProjection::Bounds));
        }
        let projection = self
            .overlay
            .projection()
            .ok_or(ProjectionError::Unavailable(MissingProjection::Projection))?;
        projection
            .from_lat_lng_to_container_pixel(LngLat::new(lng, lat))
            .ok_or(ProjectionError::ProjectFailed { lng, lat })
    }

    /// Container pixels to geographic position.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::Unavailable`] when the map has no projection yet;
    /// [`ProjectionError::UnprojectFailed`] when the conversion returns
    /// nothing.
    pub fn unproject(&self, x: f64, y: f64) -> Result<LngLat, ProjectionError> {
        let projection = self
            .overlay
            .projection()
            .ok_or(ProjectionError::Unavailable(MissingProjection::Projection))?;
        projection
            .from_container_pixel_to_lat_lng(PixelPoint::new(x, y))
            .ok_or(ProjectionError::UnprojectFailed { x, y })
    }

    /// Position and container offset under `raw`, when the pointer is over
    /// the visible map.
    pub fn locate(&self, raw: &RawPointerEvent) -> Option<(LngLat, PixelPoint)> {
        let bounds = self.map.bounds()?;
        let rect = self.map.div().bounding_client_rect();
        let pixel = PixelPoint::new(raw.client_x - rect.left, raw.client_y - rect.top);
        let projection = self.overlay.projection()?;
        let position = projection.from_container_pixel_to_lat_lng(pixel)?;
        self.lib
            .bounds_contains(&bounds, position)
            .then_some((position, pixel))
    }

    /// Position under `raw`.
    pub fn lng_lat_from_event(&self, raw: &RawPointerEvent) -> Option<LngLat> {
        self.locate(raw).map(|(position, _)| position)
    }
}

impl<L, M> Projector<L, M>
where
    L: MapsLibrary + 'static,
    M: GoogleMap + 'static,
{
    /// A locator for the event bridge that rounds to `precision` places.
    #[must_use]
    pub fn locator(&self, precision: u32) -> Locator {
        let projector = self.clone();
        Rc::new(move |raw: &RawPointerEvent| {
            let (position, pixel) = projector.locate(raw)?;
            Some(PointerEvent::new(position, pixel, raw.button, precision))
        })
    }
}
