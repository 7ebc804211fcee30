// Group and lasso selection on the grouped seatmap

use std::cell::RefCell;
use std::rc::Rc;

use seatmap_wasm::controls::ControlAction;
use seatmap_wasm::dom::{ControlSide, DiagramElement, Gesture, MemoryElement, MemoryHost};
use seatmap_wasm::{
    GroupValue, GroupedSeat, GroupedSeatEvents, GroupedSeatmap, GroupedSeatmapProps, SeatId,
    SeatmapWidget, SelectionMethod, CLASS_HOVER, CLASS_SELECTED,
};

const VENUE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <circle id="a"/><circle id="b"/><circle id="c"/><circle id="d"/>
</svg>"#;

#[derive(Default)]
struct Batches {
    selected: RefCell<Vec<Vec<SeatId>>>,
    deselected: RefCell<Vec<Vec<SeatId>>>,
    hovered: RefCell<Vec<SeatId>>,
}

fn batch_ids(seats: &[GroupedSeat]) -> Vec<SeatId> {
    seats.iter().map(|seat| seat.id).collect()
}

impl GroupedSeatEvents for Batches {
    fn seats_selected(&self, seats: &[GroupedSeat]) {
        self.selected.borrow_mut().push(batch_ids(seats));
    }

    fn seats_deselected(&self, seats: &[GroupedSeat]) {
        self.deselected.borrow_mut().push(batch_ids(seats));
    }

    fn seat_hovered(&self, seat: &GroupedSeat) {
        self.hovered.borrow_mut().push(seat.id);
    }
}

fn plain(value: &str) -> GroupValue {
    GroupValue::Plain(value.into())
}

/// A: row 1 scoped to section X; B: row 1, section X; C: row 1, section Y
fn venue_seats() -> Vec<GroupedSeat> {
    vec![
        GroupedSeat::new(1, "#a")
            .with_group(
                "row",
                GroupValue::Scoped {
                    value: "1".into(),
                    parent: "section".into(),
                },
            )
            .with_group("section", plain("X")),
        GroupedSeat::new(2, "#b")
            .with_group("row", plain("1"))
            .with_group("section", plain("X")),
        GroupedSeat::new(3, "#c")
            .with_group("row", plain("1"))
            .with_group("section", plain("Y")),
        GroupedSeat::new(4, "#d"),
    ]
}

fn props(selected: &[SeatId]) -> GroupedSeatmapProps {
    let mut props = GroupedSeatmapProps::new("venue.svg");
    props.available_seats = venue_seats();
    props.selected_seat_ids = selected.to_vec();
    props
}

fn ready(props: GroupedSeatmapProps) -> (GroupedSeatmap<MemoryHost>, Rc<Batches>) {
    let batches = Rc::new(Batches::default());
    let mut grouped = GroupedSeatmap::new(MemoryHost::new(), Rc::clone(&batches) as Rc<dyn GroupedSeatEvents>);
    let ticket = grouped.update(props).ticket.expect("diagram should be requested");
    grouped
        .complete_load(ticket, Ok(VENUE.to_string()))
        .expect("venue should load");
    (grouped, batches)
}

fn element(grouped: &GroupedSeatmap<MemoryHost>, id: &str) -> MemoryElement {
    grouped.host().element_by_id(id).unwrap()
}

#[test]
fn test_group_click_selects_scoped_siblings() {
    let (mut grouped, batches) = ready(props(&[]));
    assert!(grouped.toggle_group("row"));

    element(&grouped, "a").dispatch(Gesture::Click);

    assert_eq!(*batches.selected.borrow(), vec![vec![1, 2]]);
}

#[test]
fn test_group_click_on_selected_seat_deselects_batch() {
    let (mut grouped, batches) = ready(props(&[1, 2]));
    grouped.toggle_group("section");

    element(&grouped, "b").dispatch(Gesture::Click);

    assert_eq!(*batches.deselected.borrow(), vec![vec![2, 1]]);
    assert!(batches.selected.borrow().is_empty());
}

#[test]
fn test_click_without_group_mode_is_single_seat() {
    let (grouped, batches) = ready(props(&[]));

    element(&grouped, "c").dispatch(Gesture::Click);

    assert_eq!(*batches.selected.borrow(), vec![vec![3]]);
}

#[test]
fn test_seat_without_group_value_selects_alone() {
    let (mut grouped, batches) = ready(props(&[]));
    grouped.toggle_group("row");

    element(&grouped, "d").dispatch(Gesture::Click);

    assert_eq!(*batches.selected.borrow(), vec![vec![4]]);
}

#[test]
fn test_group_hover_highlights_siblings() {
    let (mut grouped, batches) = ready(props(&[]));
    grouped.toggle_group("row");

    element(&grouped, "a").dispatch(Gesture::HoverStart);
    assert!(element(&grouped, "a").has_class(CLASS_HOVER));
    assert!(element(&grouped, "b").has_class(CLASS_HOVER));
    assert!(!element(&grouped, "c").has_class(CLASS_HOVER));
    assert_eq!(*batches.hovered.borrow(), vec![1]);

    element(&grouped, "a").dispatch(Gesture::HoverEnd);
    assert!(!element(&grouped, "b").has_class(CLASS_HOVER));
}

#[test]
fn test_hover_end_clears_siblings_after_mode_change() {
    let (mut grouped, _) = ready(props(&[]));
    grouped.toggle_group("row");

    element(&grouped, "a").dispatch(Gesture::HoverStart);
    assert!(element(&grouped, "b").has_class(CLASS_HOVER));

    // Switching the group off mid-hover drops the sibling markers
    grouped.toggle_group("row");
    assert!(!element(&grouped, "b").has_class(CLASS_HOVER));

    element(&grouped, "a").dispatch(Gesture::HoverEnd);
    assert!(!element(&grouped, "a").has_class(CLASS_HOVER));
    assert!(!element(&grouped, "b").has_class(CLASS_HOVER));
}

#[test]
fn test_hover_end_uses_siblings_from_hover_start() {
    let (mut grouped, _) = ready(props(&[]));
    grouped.toggle_group("row");
    element(&grouped, "a").dispatch(Gesture::HoverStart);

    // A props update that disables grouping leaves no marker behind either
    let mut next = props(&[]);
    next.with_group_selection = false;
    grouped.update(next);
    element(&grouped, "a").dispatch(Gesture::HoverEnd);

    for id in ["a", "b", "c", "d"] {
        assert!(!element(&grouped, id).has_class(CLASS_HOVER), "{}", id);
    }
}

#[test]
fn test_drag_and_group_modes_are_exclusive() {
    let (mut grouped, _) = ready(props(&[]));
    assert!(grouped.host().pan_zoom_state().pan_enabled);

    grouped.toggle_group("row");
    assert_eq!(grouped.mode().active_group(), Some("row"));
    assert!(grouped.host().pan_zoom_state().pan_enabled);

    grouped.toggle_drag();
    assert_eq!(grouped.mode().active(), Some(&SelectionMethod::Drag));
    assert_eq!(grouped.mode().active_group(), None);
    assert!(!grouped.host().pan_zoom_state().pan_enabled);
    assert!(grouped.lasso_options().is_some());

    grouped.toggle_group("section");
    assert!(!grouped.mode().is_drag());
    assert!(grouped.host().pan_zoom_state().pan_enabled);
    assert!(grouped.lasso_options().is_none());

    grouped.toggle_group("section");
    assert_eq!(grouped.mode().active(), None);
}

#[test]
fn test_lasso_collects_unselected_seats_once() {
    let (mut grouped, batches) = ready(props(&[2]));
    grouped.toggle_drag();

    let a = element(&grouped, "a");
    let b = element(&grouped, "b");
    let c = element(&grouped, "c");

    grouped.drag_select(&[a.clone(), b.clone()], &[]);
    assert!(a.has_class(CLASS_SELECTED));

    let batch = grouped.drag_select_end(&[a.clone(), b, c.clone(), a]);

    assert_eq!(batch_ids(&batch), vec![1, 3]);
    assert_eq!(*batches.selected.borrow(), vec![vec![1, 3]]);
}

#[test]
fn test_lasso_is_inert_outside_drag_mode() {
    let (mut grouped, batches) = ready(props(&[]));
    let a = element(&grouped, "a");

    grouped.drag_select(&[a.clone()], &[]);
    assert!(!a.has_class(CLASS_SELECTED));
    assert!(grouped.drag_select_end(&[a]).is_empty());
    assert!(batches.selected.borrow().is_empty());
}

#[test]
fn test_leaving_drag_mode_reverts_preview() {
    let (mut grouped, _) = ready(props(&[]));
    grouped.toggle_drag();

    let a = element(&grouped, "a");
    grouped.drag_select(&[a.clone()], &[]);
    assert!(a.has_class(CLASS_SELECTED));

    grouped.toggle_drag();
    assert!(!a.has_class(CLASS_SELECTED));
}

#[test]
fn test_disabled_modes_refuse_toggles() {
    let mut disabled = props(&[]);
    disabled.with_group_selection = false;
    disabled.with_drag_selection = false;
    let (mut grouped, _) = ready(disabled);

    assert!(!grouped.toggle_group("row"));
    assert!(!grouped.toggle_drag());
    assert!(!grouped.perform(&ControlAction::ToggleDrag));
    assert!(grouped.group_names().is_empty());
    assert_eq!(grouped.mode().active(), None);
}

#[test]
fn test_disabling_drag_in_props_clears_active_mode() {
    let (mut grouped, _) = ready(props(&[]));
    grouped.toggle_drag();

    let mut next = props(&[]);
    next.with_drag_selection = false;
    grouped.update(next);

    assert!(!grouped.mode().is_drag());
    assert!(grouped.host().pan_zoom_state().pan_enabled);
}

#[test]
fn test_selection_controls_rendered_per_group() {
    let (mut grouped, _) = ready(props(&[]));
    assert_eq!(grouped.group_names(), vec!["row".to_string(), "section".to_string()]);

    grouped.perform(&ControlAction::ToggleGroup("row".into()));

    let left = grouped.host().controls(ControlSide::Left);
    assert!(left.contains(r#"data-action="toggle-group""#));
    assert!(left.contains(r#"data-group="row""#));
    assert!(left.contains(r#"data-group="section""#));
    assert!(left.contains(r#"data-action="toggle-drag""#));
}
