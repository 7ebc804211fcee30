//! Seatmap WASM API
//!
//! The JavaScript-facing surface: one exported class per widget, plus the
//! helpers they share.
//!
//! # Module Structure
//!
//! - `helpers`: Serialization, error conversion and the log-level switch
//! - `callbacks`: Host callback objects adapted to the event traits
//! - `widgets`: The `Seatmap`, `GroupedSeatmap`, `SeatmapInput` and
//!   `SeatmapAccordion` classes

pub mod callbacks;
pub mod helpers;
pub mod widgets;

pub use helpers::set_log_level;
pub use widgets::{JsGroupedSeatmap, JsSeatmap, JsSeatmapAccordion, JsSeatmapInput};
