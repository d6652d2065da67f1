//! Coordinate conversion through the view projection.

use std::rc::Rc;

use mapbridge_core::{
    LngLat, Locator, MapContainer, MissingProjection, PixelPoint, PointerEvent, ProjectionError,
    RawPointerEvent,
};

use crate::host::{OpenLayersLibrary, OpenLayersMap};

/// Projects between geography and viewport pixels for one map.
///
/// Positions go through the view projection first (`fromLonLat`), then
/// through the map's frame state (`getPixelFromCoordinate`). The frame state
/// exists only after OpenLayers has rendered once.
pub struct OlProjector<L, M> {
    lib: Rc<L>,
    map: Rc<M>,
}

impl<L, M> Clone for OlProjector<L, M> {
    fn clone(&self) -> Self {
        Self {
            lib: Rc::clone(&self.lib),
            map: Rc::clone(&self.map),
        }
    }
}

impl<L, M> OlProjector<L, M>
where
    L: OpenLayersLibrary,
    M: OpenLayersMap<L::Layer>,
{
    /// Project through `map`'s view.
    #[must_use]
    pub const fn new(lib: Rc<L>, map: Rc<M>) -> Self {
        Self { lib, map }
    }

    fn projection_code(&self) -> Result<String, ProjectionError> {
        self.map
            .projection_code()
            .ok_or(ProjectionError::Unavailable(MissingProjection::Projection))
    }

    /// Geographic position to viewport pixels.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::Unavailable`] without a view projection or before
    /// the first frame; [`ProjectionError::ProjectFailed`] when the position
    /// cannot be expressed in the view projection.
    pub fn project(&self, lng: f64, lat: f64) -> Result<PixelPoint, ProjectionError> {
        let code = self.projection_code()?;
        let coordinate = self
            .lib
            .from_lon_lat(LngLat::new(lng, lat), &code)
            .ok_or(ProjectionError::ProjectFailed { lng, lat })?;
        self.map
            .pixel_from_coordinate(coordinate)
            .ok_or(ProjectionError::Unavailable(MissingProjection::Frame))
    }

    /// Viewport pixels to geographic position.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::Unavailable`] without a view projection or before
    /// the first frame; [`ProjectionError::UnprojectFailed`] when the view
    /// coordinate has no geographic equivalent.
    pub fn unproject(&self, x: f64, y: f64) -> Result<LngLat, ProjectionError> {
        let code = self.projection_code()?;
        let coordinate = self
            .map
            .coordinate_from_pixel(PixelPoint::new(x, y))
            .ok_or(ProjectionError::Unavailable(MissingProjection::Frame))?;
        self.lib
            .to_lon_lat(coordinate, &code)
            .ok_or(ProjectionError::UnprojectFailed { x, y })
    }

    /// Position and viewport offset under `raw`.
    pub fn locate(&self, raw: &RawPointerEvent) -> Option<(LngLat, PixelPoint)> {
        let rect = self.map.viewport().bounding_client_rect();
        let pixel = PixelPoint::new(raw.client_x - rect.left, raw.client_y - rect.top);
        self.unproject(pixel.x, pixel.y)
            .ok()
            .map(|position| (position, pixel))
    }

    /// Position under `raw`.
    pub fn lng_lat_from_event(&self, raw: &RawPointerEvent) -> Option<LngLat> {
        self.locate(raw).map(|(position, _)| position)
    }
}

impl<L, M> OlProjector<L, M>
where
    L: OpenLayersLibrary + 'static,
    M: OpenLayersMap<L::Layer> + 'static,
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
