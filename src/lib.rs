//! Facade crate for the `mapbridge` map-engine adapters.
//!
//! This crate re-exports the engine-neutral contract and exposes the engine
//! bindings behind feature flags.

#![forbid(unsafe_code)]

pub use mapbridge_core::{
    AdapterCallbacks, AdapterConfig, ChangeSet, ConfigError, CursorController, CursorState,
    EventBridge, Feature, FeatureId, FeatureStyle, GeometryKind, LngLat, MapAdapter,
    MapContainer, MapDraggability, MissingProjection, ModeStyles, PixelPoint, PointerButton,
    PointerEvent, ProjectionError, RawPointerEvent, RenderError, SharedStyleResolver,
    StyleResolver, geojson,
};

#[cfg(feature = "google-maps")]
pub use mapbridge_google::GoogleMapsAdapter;

#[cfg(feature = "openlayers")]
pub use mapbridge_openlayers::OpenLayersAdapter;

/// Engine bindings, each with its host traits.
pub mod engines {
    #[cfg(feature = "google-maps")]
    pub use mapbridge_google as google;

    #[cfg(feature = "openlayers")]
    pub use mapbridge_openlayers as openlayers;
}
