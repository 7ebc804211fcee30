//! The raw seatmap widget
//!
//! Binds host props to a [`SyncEngine`] and renders the action bars. The
//! grouping layer and the wrappers are built on top of this.

use std::rc::Rc;

use crate::controls::{zoom_controls, ActionGroup, ControlAction, ControlBar};
use crate::dom::{ControlSide, DiagramHost};
use crate::error::FetchError;
use crate::models::{ControlDescriptor, SeatmapProps, SelectionSet};
use crate::sync::{DiagramState, LoadTicket, PaintReport, SeatEvents, SyncEngine};

/// What one props update did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Set when the diagram source changed and has to be fetched
    pub ticket: Option<LoadTicket>,
    pub report: PaintReport,
}

/// Operations shared by every mounted widget flavour
pub trait SeatmapWidget {
    type Props;
    type Host: DiagramHost;

    fn update(&mut self, props: Self::Props) -> UpdateOutcome;

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport>;

    /// Run a control bar action; `false` when this widget has no use for it
    fn perform(&mut self, action: &ControlAction) -> bool;

    fn host(&self) -> &Self::Host;

    fn state(&self) -> &DiagramState;

    fn unmount(&mut self);
}

pub struct Seatmap<H: DiagramHost> {
    engine: SyncEngine<H>,
    show_zoom_controls: bool,
    left_controls: Vec<ControlDescriptor>,
    right_controls: Vec<ControlDescriptor>,
    /// Injected between the zoom group and the host's left controls
    selection_controls: Option<ActionGroup>,
}

impl<H: DiagramHost> Seatmap<H> {
    pub fn new(host: H, events: Rc<dyn SeatEvents>) -> Self {
        Self {
            engine: SyncEngine::new(host, events),
            show_zoom_controls: true,
            left_controls: Vec::new(),
            right_controls: Vec::new(),
            selection_controls: None,
        }
    }

    pub fn engine(&self) -> &SyncEngine<H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SyncEngine<H> {
        &mut self.engine
    }

    pub fn set_selection_controls(&mut self, controls: Option<ActionGroup>) {
        self.selection_controls = controls;
    }

    pub fn set_allow_pan(&mut self, allow: bool) {
        self.engine.set_allow_pan(allow);
    }

    pub fn zoom_in(&mut self) {
        self.engine.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.engine.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.engine.reset_zoom();
    }

    /// Re-render both action bars from the current props
    pub fn render_controls(&mut self) {
        let mut left = ControlBar::new();
        if self.show_zoom_controls {
            left.push(zoom_controls());
        }
        if let Some(selection) = &self.selection_controls {
            left.push(selection.clone());
        }
        left.extend_host(&self.left_controls);

        let mut right = ControlBar::new();
        right.extend_host(&self.right_controls);

        let host = self.engine.host_mut();
        host.render_controls(ControlSide::Left, &left.render());
        host.render_controls(ControlSide::Right, &right.render());
    }
}

impl<H: DiagramHost> SeatmapWidget for Seatmap<H> {
    type Props = SeatmapProps;
    type Host = H;

    fn update(&mut self, props: SeatmapProps) -> UpdateOutcome {
        let ticket = self.engine.set_source(&props.svg);
        self.engine.set_allow_pan(props.allow_drag_and_pan);

        let selection = SelectionSet::from(&props.selected_seat_ids[..]);
        let report = self.engine.update(props.available_seats, selection);

        self.show_zoom_controls = props.show_zoom_controls;
        self.left_controls = props.left_controls;
        self.right_controls = props.right_controls;
        self.render_controls();

        UpdateOutcome { ticket, report }
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport> {
        self.engine.complete_load(ticket, result)
    }

    fn perform(&mut self, action: &ControlAction) -> bool {
        match action {
            ControlAction::ZoomIn => self.zoom_in(),
            ControlAction::ResetZoom => self.reset_zoom(),
            ControlAction::ZoomOut => self.zoom_out(),
            ControlAction::ToggleGroup(_) | ControlAction::ToggleDrag => return false,
        }
        true
    }

    fn host(&self) -> &H {
        self.engine.host()
    }

    fn state(&self) -> &DiagramState {
        self.engine.state()
    }

    fn unmount(&mut self) {
        self.engine.unmount();
    }
}
