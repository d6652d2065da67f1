//! Engine-neutral adapter contract for interactive map drawing.
//!
//! Drawing modes and feature stores talk to map engines through the
//! [`MapAdapter`] trait. Each engine binding (Google Maps, OpenLayers, ...)
//! implements it against a small set of host traits describing the engine's
//! own API, so the same caller code can drive every engine.
//!
//! The crate also carries the pieces every binding shares:
//!
//! - the data model ([`Feature`], [`ChangeSet`], [`LngLat`], [`PixelPoint`]);
//! - GeoJSON encoding of features ([`geojson`]);
//! - the [`CursorController`], which owns one styling handle per adapter;
//! - the [`EventBridge`], which turns raw pointer input into clicks, moves and
//!   drags.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adapter;
mod config;
mod coords;
mod cursor;
mod dom;
mod error;
mod events;
mod feature;
pub mod geojson;
mod style;

#[doc(hidden)]
pub mod test_support;

pub use adapter::MapAdapter;
pub use config::{AdapterConfig, ConfigError, MAX_COORDINATE_PRECISION};
pub use coords::{LngLat, PixelPoint};
pub use cursor::{CursorController, CursorState, ParseCursorError};
pub use dom::{
    ClientRect, ListenerId, MapContainer, PointerEventKind, PointerHandler, StyleDeclaration,
    StylePriority,
};
pub use error::{MissingProjection, ProjectionError, RenderError};
pub use events::{
    AdapterCallbacks, Dispatcher, EventBridge, Locator, MapDraggability, PointerButton,
    PointerEvent, RawPointerEvent,
};
pub use feature::{ChangeSet, Feature, FeatureId, GeometryKind, Properties};
pub use style::{FeatureStyle, ModeStyles, SharedStyleResolver, StyleResolver};
