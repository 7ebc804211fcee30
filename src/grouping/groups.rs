//! Group membership
//!
//! Two seats share a group when they hold the same value for it. A scoped
//! value (`{ value, parent }`) additionally requires the parent group's
//! values to agree, so "row 1" in one section does not pull in "row 1" of
//! every other section.

use indexmap::IndexSet;

use crate::models::GroupedSeat;

/// Whether `candidate` holds the same value as `origin` for `group`
///
/// A seat without a value for the group belongs to no group.
pub fn same_group(candidate: &GroupedSeat, origin: &GroupedSeat, group: &str) -> bool {
    match (
        candidate.selection_groups.get(group),
        origin.selection_groups.get(group),
    ) {
        (Some(candidate), Some(origin)) => candidate.value() == origin.value(),
        _ => false,
    }
}

/// Every seat sharing `origin`'s `group`, including `origin` itself
pub fn find_seats_in_group<'a>(
    seats: &'a [GroupedSeat],
    origin: &GroupedSeat,
    group: &str,
) -> Vec<&'a GroupedSeat> {
    let Some(value) = origin.selection_groups.get(group) else {
        return Vec::new();
    };

    // A parent the origin has no value for cannot narrow anything
    let parent = value
        .parent()
        .filter(|parent| origin.selection_groups.get(parent).is_some());

    seats
        .iter()
        .filter(|seat| same_group(seat, origin, group))
        .filter(|seat| parent.map_or(true, |parent| same_group(seat, origin, parent)))
        .collect()
}

/// Group names used anywhere in the seat list, in first-seen order
pub fn discover_group_names(seats: &[GroupedSeat]) -> Vec<String> {
    let names: IndexSet<&str> = seats
        .iter()
        .flat_map(|seat| seat.selection_groups.names())
        .collect();
    names.into_iter().map(String::from).collect()
}

/// Toggle label: the first character of the group name
pub fn group_label(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupValue;

    fn scoped(value: &str, parent: &str) -> GroupValue {
        GroupValue::Scoped {
            value: value.into(),
            parent: parent.into(),
        }
    }

    fn plain(value: &str) -> GroupValue {
        GroupValue::Plain(value.into())
    }

    fn ids(seats: Vec<&GroupedSeat>) -> Vec<u32> {
        seats.into_iter().map(|seat| seat.id).collect()
    }

    #[test]
    fn test_scoped_group_respects_parent() {
        let seats = vec![
            GroupedSeat::new(1, "#a")
                .with_group("row", scoped("1", "section"))
                .with_group("section", plain("X")),
            GroupedSeat::new(2, "#b")
                .with_group("row", plain("1"))
                .with_group("section", plain("X")),
            GroupedSeat::new(3, "#c")
                .with_group("row", plain("1"))
                .with_group("section", plain("Y")),
        ];

        assert_eq!(ids(find_seats_in_group(&seats, &seats[0], "row")), vec![1, 2]);
    }

    #[test]
    fn test_plain_group_spans_parents() {
        let seats = vec![
            GroupedSeat::new(1, "#a")
                .with_group("row", plain("1"))
                .with_group("section", plain("X")),
            GroupedSeat::new(2, "#b")
                .with_group("row", plain("1"))
                .with_group("section", plain("Y")),
        ];

        assert_eq!(ids(find_seats_in_group(&seats, &seats[0], "row")), vec![1, 2]);
    }

    #[test]
    fn test_seat_without_group_value_has_no_siblings() {
        let seats = vec![
            GroupedSeat::new(1, "#a"),
            GroupedSeat::new(2, "#b"),
            GroupedSeat::new(3, "#c").with_group("row", plain("1")),
        ];

        assert!(find_seats_in_group(&seats, &seats[0], "row").is_empty());
        assert!(!same_group(&seats[1], &seats[0], "row"));
    }

    #[test]
    fn test_dangling_parent_is_ignored() {
        let seats = vec![
            GroupedSeat::new(1, "#a").with_group("row", scoped("1", "section")),
            GroupedSeat::new(2, "#b").with_group("row", plain("1")),
        ];

        assert_eq!(ids(find_seats_in_group(&seats, &seats[0], "row")), vec![1, 2]);
    }

    #[test]
    fn test_discover_group_names_in_order() {
        let seats = vec![
            GroupedSeat::new(1, "#a")
                .with_group("section", plain("X"))
                .with_group("row", plain("1")),
            GroupedSeat::new(2, "#b")
                .with_group("row", plain("2"))
                .with_group("table", plain("T4")),
        ];

        assert_eq!(discover_group_names(&seats), vec!["section", "row", "table"]);
    }

    #[test]
    fn test_group_label_is_first_character() {
        assert_eq!(group_label("row"), "r");
        assert_eq!(group_label("Ärea"), "Ä");
        assert_eq!(group_label(""), "");
    }
}
