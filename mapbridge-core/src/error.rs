//! Errors surfaced by adapters.

use thiserror::Error;

use crate::FeatureId;

/// Which piece of projection state the host engine has not produced yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MissingProjection {
    /// The map does not report viewport bounds.
    #[error("map bounds are not available")]
    Bounds,
    /// No projection object is available from the engine.
    #[error("map projection is not available")]
    Projection,
    /// The engine has not rendered a frame, so pixel lookups return nothing.
    #[error("map has not rendered a frame")]
    Frame,
}

/// Errors from [`crate::MapAdapter::project`] and
/// [`crate::MapAdapter::unproject`].
///
/// Both usually mean the engine is still initialising its view. Callers
/// handling continuous pointer input should treat them as "not ready yet".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The engine has not produced the state needed to project.
    #[error("projection unavailable: {0}")]
    Unavailable(MissingProjection),
    /// The engine's conversion returned no pixel for the position.
    #[error("cannot project ({lng}, {lat}) to container pixels")]
    ProjectFailed {
        /// Requested longitude.
        lng: f64,
        /// Requested latitude.
        lat: f64,
    },
    /// The engine's conversion returned no position for the pixel.
    #[error("cannot unproject container pixel ({x}, {y})")]
    UnprojectFailed {
        /// Requested horizontal offset.
        x: f64,
        /// Requested vertical offset.
        y: f64,
    },
}

/// Problems met while reconciling a change-set.
///
/// These never reach the caller of `render`; adapters log and skip them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// An update or delete named an id the engine does not hold.
    #[error("feature {id} is not present in the native layer")]
    FeatureNotFound {
        /// Identifier that could not be resolved.
        id: FeatureId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MissingProjection::Bounds, "projection unavailable: map bounds are not available")]
    #[case(
        MissingProjection::Projection,
        "projection unavailable: map projection is not available"
    )]
    #[case(MissingProjection::Frame, "projection unavailable: map has not rendered a frame")]
    fn describes_missing_state(#[case] missing: MissingProjection, #[case] expected: &str) {
        assert_eq!(ProjectionError::Unavailable(missing).to_string(), expected);
    }

    #[rstest]
    fn missing_state_is_a_standalone_error() {
        let error: Box<dyn std::error::Error> = Box::new(MissingProjection::Frame);
        assert_eq!(error.to_string(), "map has not rendered a frame");
        assert!(error.source().is_none());
    }
}
