//! Cursor state and the controller that writes it to the container.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{StyleDeclaration, StylePriority};

/// Cursor shapes a drawing mode may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CursorState {
    /// Fall back to whatever the engine shows.
    #[default]
    Unset,
    /// `pointer`
    Pointer,
    /// `move`
    Move,
    /// `crosshair`
    Crosshair,
    /// `grab`
    Grab,
    /// `grabbing`
    Grabbing,
    /// `wait`
    Wait,
}

impl CursorState {
    /// CSS keyword for this cursor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Pointer => "pointer",
            Self::Move => "move",
            Self::Crosshair => "crosshair",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown cursor keyword.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cursor: {0}")]
pub struct ParseCursorError(String);

impl FromStr for CursorState {
    type Err = ParseCursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "pointer" => Ok(Self::Pointer),
            "move" => Ok(Self::Move),
            "crosshair" => Ok(Self::Crosshair),
            "grab" => Ok(Self::Grab),
            "grabbing" => Ok(Self::Grabbing),
            "wait" => Ok(Self::Wait),
            other => Err(ParseCursorError(other.to_owned())),
        }
    }
}

/// Tracks the applied cursor and the style handle it was written through.
///
/// The handle is created lazily on the first non-`Unset` cursor and reused
/// afterwards, so engines that need a stylesheet rule get exactly one.
/// Repeating the current cursor performs no writes.
///
/// # Examples
///
/// ```
/// use mapbridge_core::{CursorController, CursorState, StylePriority};
/// use mapbridge_core::test_support::MockStyle;
///
/// let style = MockStyle::default();
/// let mut cursor = CursorController::new(StylePriority::Normal);
/// assert!(cursor.apply(CursorState::Pointer, || style.clone()));
/// assert!(!cursor.apply(CursorState::Pointer, || style.clone()));
/// assert_eq!(style.property("cursor").as_deref(), Some("pointer"));
/// ```
#[derive(Debug)]
pub struct CursorController<S> {
    state: CursorState,
    handle: Option<S>,
    priority: StylePriority,
}

impl<S: StyleDeclaration> CursorController<S> {
    /// A controller that writes declarations with `priority`.
    #[must_use]
    pub const fn new(priority: StylePriority) -> Self {
        Self {
            state: CursorState::Unset,
            handle: None,
            priority,
        }
    }

    /// Cursor most recently applied.
    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    /// `true` once a style handle has been created.
    #[must_use]
    pub const fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Apply `cursor`, creating the style handle with `create` if this is the
    /// first visible cursor. Returns `true` when the state changed.
    pub fn apply<F>(&mut self, cursor: CursorState, create: F) -> bool
    where
        F: FnOnce() -> S,
    {
        if cursor == self.state {
            return false;
        }
        self.state = cursor;
        if cursor == CursorState::Unset {
            if let Some(handle) = &self.handle {
                handle.remove_property("cursor");
            }
            return true;
        }
        let handle = self.handle.get_or_insert_with(create);
        handle.set_property("cursor", cursor.as_str(), self.priority);
        true
    }
}
