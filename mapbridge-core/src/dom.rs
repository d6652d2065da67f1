//! The slice of the host document that adapters touch.
//!
//! Engines render into a container element; adapters read its geometry,
//! write cursor styles and listen for pointer input on it. Bindings to a real
//! document implement these traits; tests use the doubles in
//! [`crate::test_support`].

use crate::RawPointerEvent;

/// Priority flag attached to a CSS declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StylePriority {
    /// Plain declaration.
    #[default]
    Normal,
    /// `!important` declaration, needed to beat engine stylesheets.
    Important,
}

/// A writable set of CSS declarations: an element's inline style or the body
/// of a stylesheet rule.
pub trait StyleDeclaration {
    /// Set `name` to `value`.
    fn set_property(&self, name: &str, value: &str, priority: StylePriority);

    /// Drop the declaration for `name`, if any.
    fn remove_property(&self, name: &str);
}

/// Container bounding box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    /// Distance from the viewport's left edge.
    pub left: f64,
    /// Distance from the viewport's top edge.
    pub top: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

/// Handle returned when a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Pointer events the bridge subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// `pointerdown`
    Down,
    /// `pointermove`
    Move,
    /// `pointerup`
    Up,
}

impl PointerEventKind {
    /// DOM event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "pointerdown",
            Self::Move => "pointermove",
            Self::Up => "pointerup",
        }
    }
}

/// Listener callback for raw pointer input.
pub type PointerHandler = Box<dyn FnMut(&RawPointerEvent)>;

/// The element an engine renders into.
///
/// Methods take `&self`; host handles are cheap references to shared
/// document nodes.
pub trait MapContainer {
    /// Declaration block type produced by this container.
    type Style: StyleDeclaration;

    /// The element's `id` attribute, empty when unset.
    fn id(&self) -> String;

    /// Replace the element's `id` attribute.
    fn set_id(&self, id: &str);

    /// Current bounding box.
    fn bounding_client_rect(&self) -> ClientRect;

    /// The element's inline style.
    fn inline_style(&self) -> Self::Style;

    /// Append a stylesheet rule matching `selector` and return its
    /// declaration block.
    fn insert_scoped_rule(&self, selector: &str) -> Self::Style;

    /// Attach `handler` for `kind` events.
    fn add_pointer_listener(&self, kind: PointerEventKind, handler: PointerHandler) -> ListenerId;

    /// Detach a listener added by [`MapContainer::add_pointer_listener`].
    /// Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}
