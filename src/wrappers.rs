//! Host-facing wrappers around the grouped seatmap
//!
//! Both are controlled: the host owns the value and passes it back in on the
//! next update. The wrappers only compute what the value should become.

use std::cell::RefCell;
use std::rc::Rc;

use crate::controls::ControlAction;
use crate::dom::DiagramHost;
use crate::error::FetchError;
use crate::grouping::{GroupedSeatEvents, GroupedSeatmap};
use crate::models::{
    GroupedSeat, GroupedSeatmapProps, Seat, SeatId, SeatmapAccordionProps, SeatmapInputProps,
};
use crate::seatmap::{SeatmapWidget, UpdateOutcome};
use crate::sync::{DiagramState, LoadTicket, PaintReport};

pub type ChangeHandler = Rc<dyn Fn(Vec<SeatId>)>;
pub type ClickHandler = Rc<dyn Fn(SeatId, bool)>;

/// `value` with the batch's seats appended, skipping ones already present
pub fn with_seats_added(value: &[SeatId], seats: &[GroupedSeat]) -> Vec<SeatId> {
    let mut next = value.to_vec();
    for seat in seats {
        if !next.contains(&seat.id) {
            next.push(seat.id);
        }
    }
    next
}

/// `value` without the batch's seats
pub fn with_seats_removed(value: &[SeatId], seats: &[GroupedSeat]) -> Vec<SeatId> {
    value
        .iter()
        .copied()
        .filter(|id| !seats.iter().any(|seat| seat.id == *id))
        .collect()
}

fn placed(seats: &[Seat]) -> Vec<GroupedSeat> {
    seats.iter().filter_map(Seat::to_grouped).collect()
}

struct InputEvents {
    value: Rc<RefCell<Vec<SeatId>>>,
    on_change: ChangeHandler,
}

impl InputEvents {
    fn emit(&self, next: Vec<SeatId>) {
        let changed = *self.value.borrow() != next;
        if changed {
            (self.on_change)(next);
        }
    }
}

impl GroupedSeatEvents for InputEvents {
    fn seats_selected(&self, seats: &[GroupedSeat]) {
        let next = with_seats_added(&self.value.borrow(), seats);
        self.emit(next);
    }

    fn seats_deselected(&self, seats: &[GroupedSeat]) {
        let next = with_seats_removed(&self.value.borrow(), seats);
        self.emit(next);
    }
}

/// Seat picker bound to a list of selected IDs, like a form input
pub struct SeatmapInput<H: DiagramHost> {
    inner: GroupedSeatmap<H>,
    value: Rc<RefCell<Vec<SeatId>>>,
}

impl<H: DiagramHost> SeatmapInput<H> {
    pub fn new(host: H, on_change: ChangeHandler) -> Self {
        let value = Rc::new(RefCell::new(Vec::new()));
        let events = InputEvents {
            value: Rc::clone(&value),
            on_change,
        };
        Self {
            inner: GroupedSeatmap::new(host, Rc::new(events)),
            value,
        }
    }

    pub fn value(&self) -> Vec<SeatId> {
        self.value.borrow().clone()
    }

    pub fn grouped(&self) -> &GroupedSeatmap<H> {
        &self.inner
    }

    pub fn grouped_mut(&mut self) -> &mut GroupedSeatmap<H> {
        &mut self.inner
    }
}

impl<H: DiagramHost> SeatmapWidget for SeatmapInput<H> {
    type Props = SeatmapInputProps;
    type Host = H;

    fn update(&mut self, props: SeatmapInputProps) -> UpdateOutcome {
        *self.value.borrow_mut() = props.value.clone();

        let mut grouped = GroupedSeatmapProps::new(props.svg);
        grouped.available_seats = placed(&props.seats);
        grouped.selected_seat_ids = props.value;
        grouped.display_group_mapping = props.display_group_mapping;
        grouped.left_controls = props.left_controls;
        grouped.right_controls = props.right_controls;
        grouped.with_group_selection = props.with_group_selection;
        grouped.with_drag_selection = props.with_drag_selection;
        self.inner.update(grouped)
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport> {
        self.inner.complete_load(ticket, result)
    }

    fn perform(&mut self, action: &ControlAction) -> bool {
        self.inner.perform(action)
    }

    fn host(&self) -> &H {
        self.inner.host()
    }

    fn state(&self) -> &DiagramState {
        self.inner.state()
    }

    fn unmount(&mut self) {
        self.inner.unmount();
    }
}

struct AccordionEvents {
    on_click: ClickHandler,
}

impl GroupedSeatEvents for AccordionEvents {
    fn seats_selected(&self, seats: &[GroupedSeat]) {
        if let Some(seat) = seats.first() {
            (self.on_click)(seat.id, true);
        }
    }

    fn seats_deselected(&self, seats: &[GroupedSeat]) {
        if let Some(seat) = seats.first() {
            (self.on_click)(seat.id, false);
        }
    }
}

/// One seat at a time opens its panel; clicking it again closes it
pub struct SeatmapAccordion<H: DiagramHost> {
    inner: GroupedSeatmap<H>,
}

impl<H: DiagramHost> SeatmapAccordion<H> {
    pub fn new(host: H, on_click: ClickHandler) -> Self {
        Self {
            inner: GroupedSeatmap::new(host, Rc::new(AccordionEvents { on_click })),
        }
    }

    pub fn grouped(&self) -> &GroupedSeatmap<H> {
        &self.inner
    }
}

impl<H: DiagramHost> SeatmapWidget for SeatmapAccordion<H> {
    type Props = SeatmapAccordionProps;
    type Host = H;

    fn update(&mut self, props: SeatmapAccordionProps) -> UpdateOutcome {
        let mut grouped = GroupedSeatmapProps::new(props.svg);
        grouped.available_seats = placed(&props.seats);
        grouped.selected_seat_ids = props.selected_seat_ids;
        grouped.display_group_mapping = props.display_group_mapping;
        grouped.left_controls = props.left_controls;
        grouped.right_controls = props.right_controls;
        grouped.with_group_selection = false;
        grouped.with_drag_selection = false;
        self.inner.update(grouped)
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport> {
        self.inner.complete_load(ticket, result)
    }

    fn perform(&mut self, action: &ControlAction) -> bool {
        self.inner.perform(action)
    }

    fn host(&self) -> &H {
        self.inner.host()
    }

    fn state(&self) -> &DiagramState {
        self.inner.state()
    }

    fn unmount(&mut self) {
        self.inner.unmount();
    }
}
