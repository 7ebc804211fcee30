//! Models module for the seatmap
//!
//! This module contains the data the host hands to the core: seat records,
//! selection snapshots, props and collaborator options, plus the visual
//! marker vocabulary painted onto the diagram.

pub mod marker;
pub mod options;
pub mod props;
pub mod seat;
pub mod selection;

// Re-export commonly used types
pub use marker::*;
pub use options::*;
pub use props::*;
pub use seat::*;
pub use selection::SelectionSet;
