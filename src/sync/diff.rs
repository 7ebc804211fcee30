//! Snapshot diffing

use std::collections::HashMap;

use crate::models::{SeatDisplay, SeatId};

/// Seats whose record is new or differs from the previous snapshot
pub fn changed_seats<'a>(previous: &[SeatDisplay], current: &'a [SeatDisplay]) -> Vec<&'a SeatDisplay> {
    let before: HashMap<SeatId, &SeatDisplay> = previous.iter().map(|seat| (seat.id, seat)).collect();
    current
        .iter()
        .filter(|seat| before.get(&seat.id).copied() != Some(*seat))
        .collect()
}

/// Seats of the previous snapshot that are gone from the current one
pub fn removed_seats<'a>(previous: &'a [SeatDisplay], current: &[SeatDisplay]) -> Vec<&'a SeatDisplay> {
    previous
        .iter()
        .filter(|seat| !current.iter().any(|other| other.id == seat.id))
        .collect()
}
