//! OpenLayers binding for the `mapbridge` adapter contract.
//!
//! [`OpenLayersAdapter`] drives an `ol/Map` through the host traits in
//! [`host`]. Features are drawn by a single vector layer which each render
//! rebuilds from the live set; the layer's style function delegates to the
//! caller's resolver per feature. Projection chains the view projection
//! (`fromLonLat`) with the map's frame state.

#![forbid(unsafe_code)]

mod adapter;
pub mod host;
mod projection;
mod style;

#[doc(hidden)]
pub mod test_support;

pub use adapter::{DEFAULT_FEATURE_PROJECTION, OpenLayersAdapter};
pub use projection::OlProjector;
pub use style::{OlCircle, OlFill, OlStroke, OlStyle, hex_to_rgba};
