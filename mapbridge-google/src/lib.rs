//! Google Maps binding for the `mapbridge` adapter contract.
//!
//! [`GoogleMapsAdapter`] drives a `google.maps.Map` through the host traits in
//! [`host`]. Features live in the map's `Data` layer: the first render imports
//! the whole live set, later renders apply the change-set incrementally, and a
//! style function installed on every render maps each native feature back to
//! the caller's resolver. Projection goes through an `OverlayView`, so it is
//! only available once the map has drawn.

#![forbid(unsafe_code)]

mod adapter;
pub mod host;
mod projection;
mod style;

#[doc(hidden)]
pub mod test_support;

pub use adapter::GoogleMapsAdapter;
pub use projection::Projector;
pub use style::{CircleIcon, DataStyle};
