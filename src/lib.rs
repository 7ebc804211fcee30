//! Seatmap WASM Module
//!
//! Binds seat records supplied by a host page to the elements of an SVG
//! venue diagram: availability and selection are painted as classes, and
//! clicks and hovers on seats are reported back to the host.

pub mod binder;
pub mod controls;
pub mod dom;
pub mod error;
pub mod grouping;
pub mod models;
pub mod seatmap;
pub mod sync;
pub mod wrappers;
pub mod api;

// Re-export commonly used types
pub use error::{FetchError, LookupError, MarkupError};
pub use grouping::{GroupedSeatEvents, GroupedSeatmap, SelectionMethod, SelectionMode};
pub use models::*;
pub use seatmap::{Seatmap, SeatmapWidget, UpdateOutcome};
pub use sync::{DiagramState, LoadTicket, PaintReport, SeatEvents, SyncEngine};
pub use wrappers::{SeatmapAccordion, SeatmapInput};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A logger may already be installed by another module on the page
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!(target: "seatmap::api", "Seatmap WASM module initialized");
}
