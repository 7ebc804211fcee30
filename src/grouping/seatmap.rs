//! Seatmap with group and lasso selection

use std::cell::RefCell;
use std::rc::Rc;

use super::groups::{discover_group_names, find_seats_in_group, group_label};
use super::mode::SelectionMode;
use crate::binder;
use crate::controls::{ActionButton, ActionGroup, ControlAction, ControlIcon};
use crate::dom::{DiagramElement, DiagramHost};
use crate::error::FetchError;
use crate::models::{
    GroupedSeat, GroupedSeatmapProps, LassoOptions, SeatDisplay, SeatId, SeatmapProps, SelectionSet,
};
use crate::seatmap::{Seatmap, SeatmapWidget, UpdateOutcome};
use crate::sync::{DiagramState, LoadTicket, PaintReport, SeatEvents};

/// Batched notifications from the grouped seatmap
///
/// A batch starts with the seat the user interacted with, followed by the
/// seats it pulled in.
pub trait GroupedSeatEvents {
    fn seats_selected(&self, seats: &[GroupedSeat]);
    fn seats_deselected(&self, seats: &[GroupedSeat]);
    fn seat_hovered(&self, _seat: &GroupedSeat) {}
    fn seat_hover_ended(&self, _seat: &GroupedSeat) {}
}

#[derive(Debug, Default)]
struct GroupingState {
    seats: Vec<GroupedSeat>,
    selection: SelectionSet,
    mode: SelectionMode,
}

impl GroupingState {
    /// `id`'s seat, then its group siblings when a group is active
    fn expand(&self, id: SeatId) -> Vec<GroupedSeat> {
        let Some(origin) = self.seats.iter().find(|seat| seat.id == id) else {
            return Vec::new();
        };

        let mut batch = vec![origin.clone()];
        if let Some(group) = self.mode.active_group() {
            for sibling in find_seats_in_group(&self.seats, origin, group) {
                if !batch.iter().any(|seat| seat.id == sibling.id) {
                    batch.push(sibling.clone());
                }
            }
        }
        batch
    }
}

/// Turns the raw seatmap's single-seat events into batches
struct GroupingAdapter<E: DiagramElement> {
    state: Rc<RefCell<GroupingState>>,
    scope: E,
    events: Rc<dyn GroupedSeatEvents>,
    /// Elements marked by the hover in progress
    hovered: Rc<RefCell<Vec<E>>>,
}

impl<E: DiagramElement> GroupingAdapter<E> {
    fn select(&self, seat: &SeatDisplay, selected: bool) {
        let batch = self.state.borrow().expand(seat.id);
        if batch.is_empty() {
            return;
        }
        log::debug!(
            target: "seatmap::grouping",
            "Seat {} {} with {} sibling(s)",
            seat.id,
            if selected { "selected" } else { "deselected" },
            batch.len() - 1
        );
        if selected {
            self.events.seats_selected(&batch);
        } else {
            self.events.seats_deselected(&batch);
        }
    }

    fn hover(&self, seat: &SeatDisplay, hovered: bool) {
        let batch = self.state.borrow().expand(seat.id);
        clear_hover(&self.hovered);
        if hovered {
            let mut marked = self.hovered.borrow_mut();
            for member in &batch {
                if let Some(element) = binder::resolve(&self.scope, &member.lookup) {
                    binder::set_hover(&element, true);
                    marked.push(element);
                }
            }
        }

        if let Some(origin) = batch.first() {
            if hovered {
                self.events.seat_hovered(origin);
            } else {
                self.events.seat_hover_ended(origin);
            }
        }
    }
}

/// Drop the hover marker from whatever the last hover-start marked
fn clear_hover<E: DiagramElement>(hovered: &RefCell<Vec<E>>) {
    for element in hovered.take() {
        binder::set_hover(&element, false);
    }
}

impl<E: DiagramElement> SeatEvents for GroupingAdapter<E> {
    fn seat_selected(&self, seat: &SeatDisplay) {
        self.select(seat, true);
    }

    fn seat_deselected(&self, seat: &SeatDisplay) {
        self.select(seat, false);
    }

    fn seat_hovered(&self, seat: &SeatDisplay) {
        self.hover(seat, true);
    }

    fn seat_hover_ended(&self, seat: &SeatDisplay) {
        self.hover(seat, false);
    }
}

pub struct GroupedSeatmap<H: DiagramHost> {
    seatmap: Seatmap<H>,
    state: Rc<RefCell<GroupingState>>,
    events: Rc<dyn GroupedSeatEvents>,
    props: GroupedSeatmapProps,
    lasso: LassoOptions,
    /// Elements currently showing the lasso preview
    previewed: Vec<H::Element>,
    hovered: Rc<RefCell<Vec<H::Element>>>,
}

impl<H: DiagramHost> GroupedSeatmap<H> {
    pub fn new(host: H, events: Rc<dyn GroupedSeatEvents>) -> Self {
        let state = Rc::new(RefCell::new(GroupingState::default()));
        let hovered = Rc::new(RefCell::new(Vec::new()));
        let adapter = GroupingAdapter {
            state: Rc::clone(&state),
            scope: host.container(),
            events: Rc::clone(&events),
            hovered: Rc::clone(&hovered),
        };

        Self {
            seatmap: Seatmap::new(host, Rc::new(adapter)),
            state,
            events,
            props: GroupedSeatmapProps::new(""),
            lasso: LassoOptions::default(),
            previewed: Vec::new(),
            hovered,
        }
    }

    pub fn seatmap(&self) -> &Seatmap<H> {
        &self.seatmap
    }

    pub fn events(&self) -> Rc<dyn GroupedSeatEvents> {
        Rc::clone(&self.events)
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.borrow().mode.clone()
    }

    /// Group names offered as toggles
    pub fn group_names(&self) -> Vec<String> {
        if !self.props.with_group_selection {
            return Vec::new();
        }
        discover_group_names(&self.state.borrow().seats)
    }

    /// Switch group selection by `group` on or off
    ///
    /// Returns `false` when group selection is disabled.
    pub fn toggle_group(&mut self, group: &str) -> bool {
        if !self.props.with_group_selection {
            return false;
        }
        self.state.borrow_mut().mode.toggle_group(group);
        self.apply_mode();
        true
    }

    /// Switch lasso selection on or off
    ///
    /// Returns `false` when drag selection is disabled.
    pub fn toggle_drag(&mut self) -> bool {
        if !self.props.with_drag_selection {
            return false;
        }
        self.state.borrow_mut().mode.toggle_drag();
        self.apply_mode();
        true
    }

    /// Lasso configuration, while drag selection is active
    pub fn lasso_options(&self) -> Option<&LassoOptions> {
        if self.state.borrow().mode.is_drag() {
            Some(&self.lasso)
        } else {
            None
        }
    }

    pub fn zoom_in(&mut self) {
        self.seatmap.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.seatmap.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.seatmap.reset_zoom();
    }

    /// Preview a running lasso gesture
    pub fn drag_select(&mut self, added: &[H::Element], removed: &[H::Element]) {
        if !self.state.borrow().mode.is_drag() {
            return;
        }
        for element in added {
            binder::set_preview(element, true);
            if !self.previewed.iter().any(|known| known.same_node(element)) {
                self.previewed.push(element.clone());
            }
        }
        for element in removed {
            binder::set_preview(element, false);
            self.previewed.retain(|known| !known.same_node(element));
        }
    }

    /// Seats covered by a finished lasso gesture that are not selected yet
    ///
    /// Does not notify the host; see [`GroupedSeatmap::drag_select_end`].
    pub fn collect_drag_selection(&mut self, added: &[H::Element]) -> Vec<GroupedSeat> {
        self.previewed.clear();

        let state = self.state.borrow();
        if !state.mode.is_drag() {
            return Vec::new();
        }

        let mut batch: Vec<GroupedSeat> = Vec::new();
        for element in added {
            let Some(seat) = binder::matching_seat(element, &state.seats[..]) else {
                continue;
            };
            if state.selection.contains(seat.id) || batch.iter().any(|known| known.id == seat.id) {
                continue;
            }
            binder::set_preview(element, true);
            batch.push(seat.clone());
        }
        batch
    }

    /// Finish a lasso gesture, reporting newly covered seats as one batch
    pub fn drag_select_end(&mut self, added: &[H::Element]) -> Vec<GroupedSeat> {
        let batch = self.collect_drag_selection(added);
        if !batch.is_empty() {
            log::debug!(target: "seatmap::grouping", "Lasso covered {} seat(s)", batch.len());
            self.events.seats_selected(&batch);
        }
        batch
    }

    fn apply_mode(&mut self) {
        let mode = self.mode();
        // Siblings were chosen by the previous mode
        clear_hover(&self.hovered);
        if !mode.is_drag() {
            for element in self.previewed.drain(..) {
                binder::set_preview(&element, false);
            }
        }
        log::debug!(target: "seatmap::grouping", "Selection method {:?}", mode.active());

        self.seatmap.set_allow_pan(mode.allows_pan());
        let controls = self.selection_controls();
        self.seatmap.set_selection_controls(controls);
        self.seatmap.render_controls();
    }

    fn selection_controls(&self) -> Option<ActionGroup> {
        let mode = self.mode();
        let mut buttons = Vec::new();

        for group in self.group_names() {
            let selected = mode.active_group() == Some(group.as_str());
            let label = group_label(&group);
            buttons.push(ActionButton::labelled(ControlAction::ToggleGroup(group), label).selected(selected));
        }

        if self.props.with_drag_selection {
            buttons.push(
                ActionButton::icon(ControlAction::ToggleDrag, "Lasso select", ControlIcon::Lasso)
                    .selected(mode.is_drag()),
            );
        }

        if buttons.is_empty() {
            None
        } else {
            Some(ActionGroup::Buttons(buttons))
        }
    }

    fn raw_props(&self) -> SeatmapProps {
        let props = &self.props;
        SeatmapProps {
            available_seats: props
                .available_seats
                .iter()
                .map(|seat| seat.to_display(&props.display_group_mapping))
                .collect(),
            selected_seat_ids: props.selected_seat_ids.clone(),
            svg: props.svg.clone(),
            allow_drag_and_pan: self.mode().allows_pan(),
            show_zoom_controls: props.show_zoom_controls,
            left_controls: props.left_controls.clone(),
            right_controls: props.right_controls.clone(),
        }
    }
}

impl<H: DiagramHost> SeatmapWidget for GroupedSeatmap<H> {
    type Props = GroupedSeatmapProps;
    type Host = H;

    fn update(&mut self, props: GroupedSeatmapProps) -> UpdateOutcome {
        let mode_cleared = {
            let mut state = self.state.borrow_mut();
            state.seats = props.available_seats.clone();
            state.selection = SelectionSet::from(&props.selected_seat_ids[..]);
            let drop_group = !props.with_group_selection && state.mode.active_group().is_some();
            let drop_drag = !props.with_drag_selection && state.mode.is_drag();
            if drop_group || drop_drag {
                state.mode.clear();
            }
            drop_group || drop_drag
        };
        if mode_cleared {
            clear_hover(&self.hovered);
        }

        self.props = props;
        let controls = self.selection_controls();
        self.seatmap.set_selection_controls(controls);
        let raw = self.raw_props();
        self.seatmap.update(raw)
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport> {
        self.seatmap.complete_load(ticket, result)
    }

    fn perform(&mut self, action: &ControlAction) -> bool {
        match action {
            ControlAction::ToggleGroup(group) => self.toggle_group(group),
            ControlAction::ToggleDrag => self.toggle_drag(),
            _ => self.seatmap.perform(action),
        }
    }

    fn host(&self) -> &H {
        self.seatmap.host()
    }

    fn state(&self) -> &DiagramState {
        self.seatmap.state()
    }

    fn unmount(&mut self) {
        self.previewed.clear();
        self.hovered.borrow_mut().clear();
        self.seatmap.unmount();
    }
}
