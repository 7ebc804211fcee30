//! Visual marker vocabulary
//!
//! These class names are a styling contract: third-party stylesheets target
//! them directly, so they must not change.

use super::seat::SeatDisplay;

pub const CLASS_AVAILABLE: &str = "seat--available";
pub const CLASS_SELECTED: &str = "seat--selected";
pub const CLASS_UNAVAILABLE: &str = "seat--unavailable";
pub const CLASS_HOVER: &str = "seat--hover";

/// Mutually exclusive availability state of a bound element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// No seat record matches the element
    Unavailable,
    /// Matching seat, not selected
    Available,
    /// Matching seat, in the selection set
    Selected,
}

impl Availability {
    pub const ALL: [Availability; 3] = [
        Availability::Unavailable,
        Availability::Available,
        Availability::Selected,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            Availability::Unavailable => CLASS_UNAVAILABLE,
            Availability::Available => CLASS_AVAILABLE,
            Availability::Selected => CLASS_SELECTED,
        }
    }

    pub fn of(seat: Option<&SeatDisplay>, selected: bool) -> Self {
        match (seat, selected) {
            (None, _) => Availability::Unavailable,
            (Some(_), false) => Availability::Available,
            (Some(_), true) => Availability::Selected,
        }
    }
}

/// Markers to apply to one element
///
/// `hover: None` leaves the hover marker as it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerSet {
    pub availability: Availability,
    pub hover: Option<bool>,
}

impl MarkerSet {
    pub fn new(availability: Availability) -> Self {
        Self {
            availability,
            hover: None,
        }
    }

    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = Some(hover);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_of_seat() {
        let seat = SeatDisplay::new(1, "#a");
        assert_eq!(Availability::of(None, true), Availability::Unavailable);
        assert_eq!(Availability::of(Some(&seat), false), Availability::Available);
        assert_eq!(Availability::of(Some(&seat), true), Availability::Selected);
    }

    #[test]
    fn test_class_names_are_distinct() {
        let names: Vec<_> = Availability::ALL.iter().map(|a| a.class_name()).collect();
        assert_eq!(names, vec![CLASS_UNAVAILABLE, CLASS_AVAILABLE, CLASS_SELECTED]);
        assert!(!names.contains(&CLASS_HOVER));
    }
}
