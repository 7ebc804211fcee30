//! Grouping layer
//!
//! Expands a single-seat interaction into a group interaction and adds the
//! lasso multi-select mode. Everything here sits on top of the raw seatmap
//! and talks to the diagram only through the binder.

pub mod groups;
pub mod mode;
pub mod seatmap;

pub use groups::{discover_group_names, find_seats_in_group, group_label, same_group};
pub use mode::{SelectionMethod, SelectionMode};
pub use seatmap::{GroupedSeatEvents, GroupedSeatmap};
