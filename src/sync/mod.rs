//! Sync engine
//!
//! Keeps a mounted diagram consistent with the host's seat and selection
//! snapshots. The engine owns the load state machine, computes what changed
//! between snapshots and drives the binder over just those seats.

pub mod cache;
pub mod diff;
pub mod engine;
pub mod fetch;

pub use cache::DiagramCache;
pub use engine::{DiagramState, LoadTicket, PaintReport, SyncEngine};
pub use fetch::fetch_diagram;

use crate::models::SeatDisplay;

/// Single-seat notifications from the raw seatmap
///
/// Callbacks run synchronously inside a gesture handler. The engine holds no
/// borrow of itself while they run, so implementations may feed a new
/// snapshot back through `update`.
pub trait SeatEvents {
    fn seat_selected(&self, _seat: &SeatDisplay) {}
    fn seat_deselected(&self, _seat: &SeatDisplay) {}
    fn seat_hovered(&self, _seat: &SeatDisplay) {}
    fn seat_hover_ended(&self, _seat: &SeatDisplay) {}
}

/// Ignores every notification
pub struct NoEvents;

impl SeatEvents for NoEvents {}
