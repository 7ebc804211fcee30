// Form-input and accordion wrappers driven through gestures

use std::cell::RefCell;
use std::rc::Rc;

use seatmap_wasm::dom::{Gesture, MemoryHost};
use seatmap_wasm::{
    GroupValue, Seat, SeatId, SeatmapAccordion, SeatmapAccordionProps, SeatmapInput,
    SeatmapInputProps, SeatmapWidget, SelectionGroups,
};

const VENUE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <circle id="s1"/><circle id="s2"/><circle id="s3"/>
</svg>"#;

fn seat(id: SeatId, row: &str) -> Seat {
    Seat {
        id,
        lookup: Some(format!("#s{}", id)),
        display_group: None,
        selection_groups: [("row", GroupValue::Plain(row.into()))].into_iter().collect::<SelectionGroups>(),
    }
}

fn seats() -> Vec<Seat> {
    vec![
        seat(1, "A"),
        seat(2, "A"),
        seat(3, "B"),
        Seat {
            id: 9,
            lookup: None,
            display_group: None,
            selection_groups: SelectionGroups::default(),
        },
    ]
}

fn input_props(value: &[SeatId]) -> SeatmapInputProps {
    SeatmapInputProps {
        seats: seats(),
        value: value.to_vec(),
        svg: "venue.svg".into(),
        display_group_mapping: Default::default(),
        left_controls: Vec::new(),
        right_controls: Vec::new(),
        with_group_selection: true,
        with_drag_selection: true,
    }
}

fn mounted_input(value: &[SeatId]) -> (SeatmapInput<MemoryHost>, Rc<RefCell<Vec<Vec<SeatId>>>>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let mut input = SeatmapInput::new(
        MemoryHost::new(),
        Rc::new(move |value: Vec<SeatId>| sink.borrow_mut().push(value)),
    );
    let ticket = input.update(input_props(value)).ticket.unwrap();
    input.complete_load(ticket, Ok(VENUE.to_string())).unwrap();
    (input, changes)
}

#[test]
fn test_input_click_appends_to_value() {
    let (input, changes) = mounted_input(&[3]);

    input.host().element_by_id("s1").unwrap().dispatch(Gesture::Click);

    assert_eq!(*changes.borrow(), vec![vec![3, 1]]);
    // Controlled: the value only moves when the host passes it back
    assert_eq!(input.value(), vec![3]);
}

#[test]
fn test_input_click_on_selected_seat_removes_it() {
    let (input, changes) = mounted_input(&[1, 3]);

    input.host().element_by_id("s1").unwrap().dispatch(Gesture::Click);

    assert_eq!(*changes.borrow(), vec![vec![3]]);
}

#[test]
fn test_input_group_click_adds_whole_row() {
    let (mut input, changes) = mounted_input(&[]);
    input.grouped_mut().toggle_group("row");

    input.host().element_by_id("s2").unwrap().dispatch(Gesture::Click);

    assert_eq!(*changes.borrow(), vec![vec![2, 1]]);
}

#[test]
fn test_input_skips_seats_without_lookup() {
    let (input, _) = mounted_input(&[]);
    let placed: Vec<SeatId> = input.grouped().seatmap().engine().seats().iter().map(|s| s.id).collect();
    assert_eq!(placed, vec![1, 2, 3]);
}

#[test]
fn test_accordion_reports_open_and_close() {
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicks);
    let mut accordion = SeatmapAccordion::new(
        MemoryHost::new(),
        Rc::new(move |id: SeatId, selected: bool| sink.borrow_mut().push((id, selected))),
    );

    let props = SeatmapAccordionProps {
        seats: seats(),
        selected_seat_ids: vec![2],
        svg: "venue.svg".into(),
        display_group_mapping: Default::default(),
        left_controls: Vec::new(),
        right_controls: Vec::new(),
    };
    let ticket = accordion.update(props).ticket.unwrap();
    accordion.complete_load(ticket, Ok(VENUE.to_string())).unwrap();

    // Group selection is never offered, so a click stays on one seat
    assert!(accordion.grouped().group_names().is_empty());

    let host = accordion.host();
    host.element_by_id("s1").unwrap().dispatch(Gesture::Click);
    host.element_by_id("s2").unwrap().dispatch(Gesture::Click);

    assert_eq!(*clicks.borrow(), vec![(1, true), (2, false)]);
}
