//! Diagram DOM abstraction
//!
//! The binder and sync engine talk to the diagram only through these traits,
//! so the same reconciliation code drives the browser DOM (`web`) and the
//! in-memory SVG tree (`memory`) used natively and in tests.
//!
//! Every query is scoped to a `DiagramHost`'s container element; nothing
//! reaches for a global document, so several mounted seatmaps stay
//! independent.

pub mod memory;
pub mod selector;
pub mod web;

pub use memory::{MemoryElement, MemoryHost, Mutation, MutationJournal};
pub use selector::{Selector, SelectorSubject};
pub use web::{WebElement, WebHost};

use std::rc::Rc;

use crate::error::{LookupError, MarkupError};
use crate::models::PanZoomOptions;

/// Shapes that can represent a seat
pub const SHAPE_SELECTOR: &str = "circle, path, ellipse";

/// Class of the element the diagram markup is injected into
pub const CONTAINER_CLASS: &str = "seatmap__svg";

/// Pointer gestures the binder listens for on seat shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Click,
    HoverStart,
    HoverEnd,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::Click, Gesture::HoverStart, Gesture::HoverEnd];

    /// DOM event type carrying this gesture
    pub fn event_type(self) -> &'static str {
        match self {
            Gesture::Click => "click",
            Gesture::HoverStart => "mouseover",
            Gesture::HoverEnd => "mouseout",
        }
    }
}

/// Handler invoked with the gesture and the element it happened on
pub type GestureHandler<E> = Rc<dyn Fn(Gesture, &E)>;

/// A handle to one element of a mounted diagram
///
/// Handles are cheap to clone and share the underlying node, like DOM
/// references. Mutating methods take `&self` for the same reason.
pub trait DiagramElement: Clone + 'static {
    fn tag_name(&self) -> String;

    /// Test this element against a lookup expression
    fn matches(&self, selector: &str) -> Result<bool, LookupError>;

    /// First descendant matching `selector`, in document order
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, LookupError>;

    /// All descendants matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, LookupError>;

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    /// Register `handler` for every gesture on this element
    fn add_gesture_listener(&self, handler: GestureHandler<Self>);

    /// Drop every gesture handler registered on this element
    fn remove_gesture_listeners(&self);

    fn same_node(&self, other: &Self) -> bool;
}

/// A pan/zoom instance bound to the diagram's root `<svg>`
pub trait PanZoom {
    fn enable_pan(&mut self);
    fn disable_pan(&mut self);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);

    /// Resize, center and fit the diagram to its viewport
    fn reset(&mut self);

    fn destroy(&mut self);
}

/// Which action bar a control belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSide {
    Left,
    Right,
}

/// The mounted widget: a diagram container plus its two action bars
pub trait DiagramHost {
    type Element: DiagramElement;

    /// The `.seatmap__svg` element all lookups are scoped to
    fn container(&self) -> Self::Element;

    /// Replace the container contents with diagram markup
    fn inject(&mut self, markup: &str) -> Result<(), MarkupError>;

    /// Replace the container contents with a visible error message
    fn show_error(&mut self, message: &str);

    /// Empty the container
    fn clear(&mut self);

    /// Bind a pan/zoom instance to the injected `<svg>`
    ///
    /// Returns `None` when there is no diagram to bind to or the pan/zoom
    /// library is not available.
    fn attach_pan_zoom(&mut self, options: &PanZoomOptions) -> Option<Box<dyn PanZoom>>;

    /// Replace the markup of one action bar
    fn render_controls(&mut self, side: ControlSide, markup: &str);
}
