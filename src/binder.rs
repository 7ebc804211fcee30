//! Element binder
//!
//! Maps seat records onto diagram elements and writes the visual state the
//! stylesheet keys off. Lookup expressions come from the host and may be
//! wrong; a failed lookup is logged and treated as "not on this diagram".

use std::rc::Rc;

use crate::dom::{DiagramElement, GestureHandler, SHAPE_SELECTOR};
use crate::models::{
    Availability, Locatable, MarkerSet, SeatDisplay, SelectionSet, CLASS_AVAILABLE, CLASS_HOVER,
    CLASS_SELECTED,
};

/// Set on elements whose inline style the binder wrote
pub const COLOR_MARKER_ATTR: &str = "data-seatmap-color";

/// First element under `scope` matching a seat's lookup expression
pub fn resolve<E: DiagramElement>(scope: &E, lookup: &str) -> Option<E> {
    match scope.query_selector(lookup) {
        Ok(found) => found,
        Err(err) => {
            log::debug!(target: "seatmap::binder", "{}", err);
            None
        }
    }
}

/// Every shape under `scope` that can represent a seat
pub fn candidates<E: DiagramElement>(scope: &E) -> Vec<E> {
    scope.query_selector_all(SHAPE_SELECTOR).unwrap_or_else(|err| {
        log::warn!(target: "seatmap::binder", "{}", err);
        Vec::new()
    })
}

/// The first seat whose lookup expression matches `element`
pub fn matching_seat<'a, E, S>(element: &E, seats: &'a [S]) -> Option<&'a S>
where
    E: DiagramElement,
    S: Locatable,
{
    seats.iter().find(|seat| match element.matches(seat.lookup()) {
        Ok(matched) => matched,
        Err(err) => {
            log::debug!(target: "seatmap::binder", "seat {}: {}", seat.seat_id(), err);
            false
        }
    })
}

/// Write `markers` onto `element`, with an optional colour override
pub fn apply_marker<E: DiagramElement>(element: &E, markers: MarkerSet, color: Option<&str>) {
    for availability in Availability::ALL {
        element.remove_class(availability.class_name());
    }
    element.add_class(markers.availability.class_name());

    if let Some(hover) = markers.hover {
        set_hover(element, hover);
    }

    paint_color(element, markers.availability, color);
}

fn paint_color<E: DiagramElement>(element: &E, availability: Availability, color: Option<&str>) {
    match color {
        Some(color) if availability != Availability::Unavailable => {
            let mut style = format!("stroke: {} !important;", color);
            if availability == Availability::Selected {
                style.push_str(&format!(" fill: {} !important;", color));
            }
            element.set_attribute("style", &style);
            element.set_attribute(COLOR_MARKER_ATTR, color);
        }
        _ => {
            if element.attribute(COLOR_MARKER_ATTR).is_some() {
                element.remove_attribute("style");
                element.remove_attribute(COLOR_MARKER_ATTR);
            }
        }
    }
}

/// Paint `element` for `seat`; no seat means unavailable
pub fn paint_seat<E: DiagramElement>(element: &E, seat: Option<&SeatDisplay>, selection: &SelectionSet) {
    let selected = seat.map_or(false, |seat| selection.contains(seat.id));
    let availability = Availability::of(seat, selected);
    let color = seat.and_then(|seat| seat.color.as_deref());
    apply_marker(element, MarkerSet::new(availability), color);
}

pub fn set_hover<E: DiagramElement>(element: &E, hovered: bool) {
    if hovered {
        element.add_class(CLASS_HOVER);
    } else {
        element.remove_class(CLASS_HOVER);
    }
}

/// Show or drop the selected preview used while a lasso gesture is running
pub fn set_preview<E: DiagramElement>(element: &E, selected: bool) {
    if selected {
        element.remove_class(CLASS_AVAILABLE);
        element.add_class(CLASS_SELECTED);
    } else {
        element.remove_class(CLASS_SELECTED);
        element.add_class(CLASS_AVAILABLE);
    }
}

pub fn clear_listeners<E: DiagramElement>(elements: &[E]) {
    for element in elements {
        element.remove_gesture_listeners();
    }
}

/// Bind `handler` to every element, replacing whatever was bound before
pub fn attach_listeners<E: DiagramElement>(elements: &[E], handler: &GestureHandler<E>) {
    for element in elements {
        element.remove_gesture_listeners();
        element.add_gesture_listener(Rc::clone(handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DiagramHost, Gesture, MemoryElement, MemoryHost};
    use crate::models::CLASS_UNAVAILABLE;
    use std::cell::Cell;

    const DIAGRAM: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <circle id="a1" class="seat"/>
        <circle id="a2" class="seat" style="opacity: 0.5"/>
        <rect id="stage"/>
    </svg>"#;

    fn host() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.inject(DIAGRAM).unwrap();
        host
    }

    #[test]
    fn test_candidates_are_shapes_only() {
        let host = host();
        let ids: Vec<_> = candidates(&host.container())
            .iter()
            .filter_map(|el| el.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_malformed_lookup_is_absent() {
        let host = host();
        assert!(resolve(&host.container(), "circle:hover").is_none());

        let seats = vec![SeatDisplay::new(1, "##broken"), SeatDisplay::new(2, "#a1")];
        let a1 = host.element_by_id("a1").unwrap();
        assert_eq!(matching_seat(&a1, &seats).map(|s| s.id), Some(2));
    }

    #[test]
    fn test_apply_marker_keeps_one_availability_class() {
        let host = host();
        let a1 = host.element_by_id("a1").unwrap();

        apply_marker(&a1, MarkerSet::new(Availability::Available), None);
        apply_marker(&a1, MarkerSet::new(Availability::Selected), None);

        assert!(a1.has_class(CLASS_SELECTED));
        assert!(!a1.has_class(CLASS_AVAILABLE));
        assert!(!a1.has_class(CLASS_UNAVAILABLE));
        assert!(a1.has_class("seat"));
    }

    #[test]
    fn test_hover_toggles_independently() {
        let host = host();
        let a1 = host.element_by_id("a1").unwrap();

        apply_marker(&a1, MarkerSet::new(Availability::Available).with_hover(true), None);
        assert!(a1.has_class(CLASS_HOVER));

        apply_marker(&a1, MarkerSet::new(Availability::Selected), None);
        assert!(a1.has_class(CLASS_HOVER));

        set_hover(&a1, false);
        assert!(!a1.has_class(CLASS_HOVER));
    }

    #[test]
    fn test_colour_override_follows_selection() {
        let host = host();
        let a1 = host.element_by_id("a1").unwrap();

        apply_marker(&a1, MarkerSet::new(Availability::Available), Some("#ef857d"));
        assert_eq!(a1.attribute("style").as_deref(), Some("stroke: #ef857d !important;"));

        apply_marker(&a1, MarkerSet::new(Availability::Selected), Some("#ef857d"));
        assert_eq!(
            a1.attribute("style").as_deref(),
            Some("stroke: #ef857d !important; fill: #ef857d !important;")
        );

        apply_marker(&a1, MarkerSet::new(Availability::Unavailable), Some("#ef857d"));
        assert!(a1.attribute("style").is_none());
        assert!(a1.attribute(COLOR_MARKER_ATTR).is_none());
    }

    #[test]
    fn test_authored_style_survives_uncoloured_paint() {
        let host = host();
        let a2 = host.element_by_id("a2").unwrap();

        paint_seat(&a2, Some(&SeatDisplay::new(2, "#a2")), &SelectionSet::new());
        assert_eq!(a2.attribute("style").as_deref(), Some("opacity: 0.5"));
    }

    #[test]
    fn test_paint_seat_without_record_is_unavailable() {
        let host = host();
        let a1 = host.element_by_id("a1").unwrap();

        paint_seat(&a1, None, &SelectionSet::new());
        assert!(a1.has_class(CLASS_UNAVAILABLE));

        let selection: SelectionSet = [1].into_iter().collect();
        paint_seat(&a1, Some(&SeatDisplay::new(1, "#a1")), &selection);
        assert!(a1.has_class(CLASS_SELECTED));
    }

    #[test]
    fn test_preview_swaps_available_and_selected() {
        let host = host();
        let a1 = host.element_by_id("a1").unwrap();
        a1.add_class(CLASS_AVAILABLE);

        set_preview(&a1, true);
        assert!(a1.has_class(CLASS_SELECTED) && !a1.has_class(CLASS_AVAILABLE));

        set_preview(&a1, false);
        assert!(a1.has_class(CLASS_AVAILABLE) && !a1.has_class(CLASS_SELECTED));
    }

    #[test]
    fn test_attach_listeners_is_idempotent() {
        let host = host();
        let shapes = candidates(&host.container());
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let handler: GestureHandler<MemoryElement> = Rc::new(move |_gesture: Gesture, _el: &MemoryElement| {
            counter.set(counter.get() + 1);
        });

        attach_listeners(&shapes, &handler);
        attach_listeners(&shapes, &handler);
        assert_eq!(shapes[0].listener_count(), 1);

        shapes[0].dispatch(Gesture::Click);
        assert_eq!(hits.get(), 1);

        clear_listeners(&shapes);
        assert_eq!(shapes[0].listener_count(), 0);
    }
}
