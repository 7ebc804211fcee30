//! Host-owned selection snapshot
//!
//! The core never edits the host's selection. It keeps the last snapshot it
//! was given and diffs the next one against it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::seat::SeatId;

/// Order-irrelevant set of selected seat IDs
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<SeatId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: SeatId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.ids.iter().copied()
    }

    /// IDs present in exactly one of the two sets (added ∪ removed)
    pub fn symmetric_difference(&self, other: &SelectionSet) -> Vec<SeatId> {
        self.ids.symmetric_difference(&other.ids).copied().collect()
    }
}

impl FromIterator<SeatId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = SeatId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl From<&[SeatId]> for SelectionSet {
    fn from(ids: &[SeatId]) -> Self {
        ids.iter().copied().collect()
    }
}
