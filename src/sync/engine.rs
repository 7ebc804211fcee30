//! Diagram lifecycle and differential repaint

use std::cell::RefCell;
use std::rc::Rc;

use super::cache::DiagramCache;
use super::diff;
use super::SeatEvents;
use crate::binder;
use crate::dom::{DiagramElement, DiagramHost, Gesture, GestureHandler, PanZoom};
use crate::error::FetchError;
use crate::models::{PanZoomOptions, SeatDisplay, SeatId, SelectionSet};

/// Where the mounted diagram is in its lifetime
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramState {
    /// No source set
    Idle,
    /// Waiting for the markup of `url`
    Loading { url: String },
    /// Markup injected, first paint running
    Painting { url: String },
    Ready { url: String },
    /// Loading failed; terminal until the source changes
    Error { error: FetchError },
}

impl DiagramState {
    pub fn url(&self) -> Option<&str> {
        match self {
            DiagramState::Idle => None,
            DiagramState::Loading { url }
            | DiagramState::Painting { url }
            | DiagramState::Ready { url } => Some(url),
            DiagramState::Error { error } => Some(error.url()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DiagramState::Ready { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagramState::Idle => "idle",
            DiagramState::Loading { .. } => "loading",
            DiagramState::Painting { .. } => "painting",
            DiagramState::Ready { .. } => "ready",
            DiagramState::Error { .. } => "error",
        }
    }
}

/// Identifies one diagram request; completions for older tickets are dropped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    url: String,
    generation: u64,
}

impl LoadTicket {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Seats a reconcile pass painted, and seats it could not find on the diagram
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintReport {
    pub painted: Vec<SeatId>,
    pub skipped: Vec<SeatId>,
}

impl PaintReport {
    pub fn is_empty(&self) -> bool {
        self.painted.is_empty() && self.skipped.is_empty()
    }

    fn covers(&self, id: SeatId) -> bool {
        self.painted.contains(&id) || self.skipped.contains(&id)
    }
}

/// Reconciles one mounted diagram with the host's snapshots
pub struct SyncEngine<H: DiagramHost> {
    host: H,
    events: Rc<dyn SeatEvents>,
    state: DiagramState,
    generation: u64,
    cache: DiagramCache,

    /// Current seat snapshot, shared with the bound gesture handler
    seats: Rc<[SeatDisplay]>,
    /// Read by the gesture handler at click time
    selection: Rc<RefCell<SelectionSet>>,

    pan_zoom_options: PanZoomOptions,
    pan_zoom: Option<Box<dyn PanZoom>>,

    /// Elements currently carrying our gesture listeners
    bound: Vec<H::Element>,
}

impl<H: DiagramHost> SyncEngine<H> {
    pub fn new(host: H, events: Rc<dyn SeatEvents>) -> Self {
        Self {
            host,
            events,
            state: DiagramState::Idle,
            generation: 0,
            cache: DiagramCache::new(),
            seats: Rc::from(Vec::new()),
            selection: Rc::new(RefCell::new(SelectionSet::new())),
            pan_zoom_options: PanZoomOptions::default(),
            pan_zoom: None,
            bound: Vec::new(),
        }
    }

    pub fn with_pan_zoom_options(mut self, options: PanZoomOptions) -> Self {
        self.pan_zoom_options = options;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn seats(&self) -> &[SeatDisplay] {
        &self.seats
    }

    pub fn selection(&self) -> SelectionSet {
        self.selection.borrow().clone()
    }

    pub fn cache(&self) -> &DiagramCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DiagramCache {
        &mut self.cache
    }

    pub fn allows_pan(&self) -> bool {
        self.pan_zoom_options.pan_enabled
    }

    /// Point the engine at a diagram source
    ///
    /// Returns a ticket when the markup has to be fetched; the caller hands
    /// the result back through [`SyncEngine::complete_load`]. The same URL
    /// as the current one is a no-op, and cached markup is injected at once.
    pub fn set_source(&mut self, url: &str) -> Option<LoadTicket> {
        let unchanged = match self.state.url() {
            Some(current) => current == url,
            None => url.is_empty(),
        };
        if unchanged {
            return None;
        }

        self.release_diagram();
        self.host.clear();
        self.generation += 1;

        if url.is_empty() {
            self.state = DiagramState::Idle;
            return None;
        }

        self.state = DiagramState::Loading {
            url: url.to_string(),
        };

        if let Some(markup) = self.cache.get(url) {
            log::debug!(target: "seatmap::sync", "Diagram {} served from cache", url);
            self.commit(url, &markup);
            return None;
        }

        log::info!(target: "seatmap::sync", "Loading diagram {}", url);
        Some(LoadTicket {
            url: url.to_string(),
            generation: self.generation,
        })
    }

    /// Finish the load started by `ticket`
    ///
    /// Returns the first paint's report, or `None` when the load failed or
    /// the ticket was superseded by a newer source.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<PaintReport> {
        let awaiting = matches!(&self.state, DiagramState::Loading { url } if *url == ticket.url);
        if ticket.generation != self.generation || !awaiting {
            log::debug!(target: "seatmap::sync", "Ignoring stale load of {}", ticket.url);
            return None;
        }

        match result {
            Ok(markup) => {
                let markup: Rc<str> = Rc::from(markup);
                self.cache.insert(ticket.url.clone(), Rc::clone(&markup));
                self.commit(&ticket.url, &markup)
            }
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    /// Apply a new seat/selection snapshot
    ///
    /// Before the diagram is ready this only records the snapshot; the first
    /// paint picks it up.
    pub fn update(&mut self, seats: Vec<SeatDisplay>, selection: SelectionSet) -> PaintReport {
        let previous_seats = std::mem::replace(&mut self.seats, Rc::from(seats));
        let previous_selection = self.selection.replace(selection);

        let mut report = PaintReport::default();
        if !self.state.is_ready() {
            return report;
        }

        let scope = self.host.container();
        let seats_changed = previous_seats[..] != self.seats[..];
        {
            let selection = self.selection.borrow();

            if seats_changed {
                for seat in diff::removed_seats(&previous_seats, &self.seats) {
                    repaint(&scope, seat, None, &selection, &mut report);
                }
                for seat in diff::changed_seats(&previous_seats, &self.seats) {
                    if let Some(previous) = previous_seats
                        .iter()
                        .find(|previous| previous.id == seat.id && previous.lookup != seat.lookup)
                    {
                        repaint_vacated(&scope, previous, &self.seats, &selection);
                    }
                    repaint(&scope, seat, Some(seat), &selection, &mut report);
                }
            }

            for id in previous_selection.symmetric_difference(&selection) {
                if report.covers(id) {
                    continue;
                }
                if let Some(seat) = self.seats.iter().find(|seat| seat.id == id) {
                    repaint(&scope, seat, Some(seat), &selection, &mut report);
                }
            }
        }

        if seats_changed {
            self.bind_listeners();
        }

        if !report.is_empty() {
            log::debug!(
                target: "seatmap::sync",
                "Repainted {:?}, not found {:?}",
                report.painted,
                report.skipped
            );
        }
        report
    }

    pub fn set_allow_pan(&mut self, allow: bool) {
        if self.pan_zoom_options.pan_enabled == allow {
            return;
        }
        self.pan_zoom_options.pan_enabled = allow;
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            if allow {
                pan_zoom.enable_pan();
            } else {
                pan_zoom.disable_pan();
            }
        }
    }

    pub fn zoom_in(&mut self) {
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            pan_zoom.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            pan_zoom.zoom_out();
        }
    }

    pub fn reset_zoom(&mut self) {
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            pan_zoom.reset();
        }
    }

    /// Tear the diagram down; pending loads become stale
    pub fn unmount(&mut self) {
        self.release_diagram();
        self.host.clear();
        self.generation += 1;
        self.state = DiagramState::Idle;
    }

    fn commit(&mut self, url: &str, markup: &str) -> Option<PaintReport> {
        if let Err(err) = self.host.inject(markup) {
            self.cache.evict(url);
            self.fail(FetchError::Markup {
                url: url.to_string(),
                message: err.to_string(),
            });
            return None;
        }

        self.state = DiagramState::Painting {
            url: url.to_string(),
        };
        let report = self.full_paint();

        self.pan_zoom = self.host.attach_pan_zoom(&self.pan_zoom_options);
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            pan_zoom.reset();
        }

        self.bind_listeners();
        self.state = DiagramState::Ready {
            url: url.to_string(),
        };

        log::info!(
            target: "seatmap::sync",
            "Diagram {} ready: {} seats painted, {} not found",
            url,
            report.painted.len(),
            report.skipped.len()
        );
        Some(report)
    }

    fn fail(&mut self, error: FetchError) {
        log::error!(target: "seatmap::sync", "{}", error);
        self.host.show_error(&error.to_string());
        self.state = DiagramState::Error { error };
    }

    fn full_paint(&self) -> PaintReport {
        let scope = self.host.container();
        let selection = self.selection.borrow();
        let mut report = PaintReport::default();

        for element in binder::candidates(&scope) {
            let seat = binder::matching_seat(&element, &self.seats[..]);
            binder::paint_seat(&element, seat, &selection);
            if let Some(seat) = seat {
                if !report.painted.contains(&seat.id) {
                    report.painted.push(seat.id);
                }
            }
        }

        report.skipped = self
            .seats
            .iter()
            .map(|seat| seat.id)
            .filter(|id| !report.painted.contains(id))
            .collect();
        report
    }

    fn bind_listeners(&mut self) {
        binder::clear_listeners(&self.bound);
        self.bound = binder::candidates(&self.host.container());
        let handler = self.gesture_handler();
        binder::attach_listeners(&self.bound, &handler);
    }

    fn gesture_handler(&self) -> GestureHandler<H::Element> {
        let seats = Rc::clone(&self.seats);
        let selection = Rc::clone(&self.selection);
        let events = Rc::clone(&self.events);

        Rc::new(move |gesture: Gesture, target: &H::Element| {
            let Some(seat) = binder::matching_seat(target, &seats[..]) else {
                return;
            };
            match gesture {
                Gesture::Click => {
                    let selected = selection.borrow().contains(seat.id);
                    if selected {
                        events.seat_deselected(seat);
                    } else {
                        events.seat_selected(seat);
                    }
                }
                Gesture::HoverStart => events.seat_hovered(seat),
                Gesture::HoverEnd => events.seat_hover_ended(seat),
            }
        })
    }

    fn release_diagram(&mut self) {
        binder::clear_listeners(&self.bound);
        self.bound.clear();
        if let Some(mut pan_zoom) = self.pan_zoom.take() {
            pan_zoom.destroy();
        }
    }
}

impl<H: DiagramHost> Drop for SyncEngine<H> {
    fn drop(&mut self) {
        self.release_diagram();
    }
}

fn repaint<E: DiagramElement>(
    scope: &E,
    seat: &SeatDisplay,
    record: Option<&SeatDisplay>,
    selection: &SelectionSet,
    report: &mut PaintReport,
) {
    match binder::resolve(scope, &seat.lookup) {
        Some(element) => {
            binder::paint_seat(&element, record, selection);
            report.painted.push(seat.id);
        }
        None => {
            log::debug!(target: "seatmap::sync", "Seat {} ({}) not on diagram", seat.id, seat.lookup);
            report.skipped.push(seat.id);
        }
    }
}

/// Repaint the shape a seat matched before its lookup moved
///
/// Another current seat may claim it; otherwise it is unavailable.
fn repaint_vacated<E: DiagramElement>(
    scope: &E,
    previous: &SeatDisplay,
    seats: &[SeatDisplay],
    selection: &SelectionSet,
) {
    if let Some(element) = binder::resolve(scope, &previous.lookup) {
        binder::paint_seat(&element, binder::matching_seat(&element, seats), selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryHost, Mutation};
    use crate::models::{CLASS_SELECTED, CLASS_UNAVAILABLE};
    use crate::sync::NoEvents;

    const HALL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <circle id="s1"/><circle id="s2"/><circle id="s3"/><circle id="s4"/>
    </svg>"#;

    fn seats(ids: &[SeatId]) -> Vec<SeatDisplay> {
        ids.iter()
            .map(|id| SeatDisplay::new(*id, format!("#s{}", id)))
            .collect()
    }

    fn ready_engine() -> SyncEngine<MemoryHost> {
        let mut engine = SyncEngine::new(MemoryHost::new(), Rc::new(NoEvents));
        let ticket = engine.set_source("hall.svg").unwrap();
        engine.complete_load(ticket, Ok(HALL.to_string())).unwrap();
        engine
    }

    #[test]
    fn test_first_paint_reports_found_and_missing() {
        let mut engine = SyncEngine::new(MemoryHost::new(), Rc::new(NoEvents));
        let ticket = engine.set_source("hall.svg").unwrap();
        engine.update(vec![SeatDisplay::new(1, "#s1"), SeatDisplay::new(9, "#s9")], SelectionSet::new());

        let report = engine.complete_load(ticket, Ok(HALL.to_string())).unwrap();
        assert_eq!(report.painted, vec![1]);
        assert_eq!(report.skipped, vec![9]);
        assert!(engine.state().is_ready());

        let s2 = engine.host().element_by_id("s2").unwrap();
        assert!(s2.has_class(CLASS_UNAVAILABLE));
    }

    #[test]
    fn test_removed_seat_is_painted_unavailable() {
        let mut engine = ready_engine();
        engine.update(seats(&[1, 2]), SelectionSet::new());

        let report = engine.update(seats(&[2]), SelectionSet::new());
        assert_eq!(report.painted, vec![1]);

        let s1 = engine.host().element_by_id("s1").unwrap();
        assert!(s1.has_class(CLASS_UNAVAILABLE));
    }

    #[test]
    fn test_swapped_lookups_repaint_both_shapes() {
        let mut engine = ready_engine();
        engine.update(seats(&[1, 2]), [1].into_iter().collect());

        let swapped = vec![SeatDisplay::new(1, "#s2"), SeatDisplay::new(2, "#s1")];
        engine.update(swapped, [1].into_iter().collect());

        let host = engine.host();
        assert!(host.element_by_id("s2").unwrap().has_class(CLASS_SELECTED));
        let s1 = host.element_by_id("s1").unwrap();
        assert!(!s1.has_class(CLASS_SELECTED));
        assert!(!s1.has_class(CLASS_UNAVAILABLE));
    }

    #[test]
    fn test_changed_seat_also_in_selection_diff_is_painted_once() {
        let mut engine = ready_engine();
        engine.update(seats(&[1]), SelectionSet::new());

        let mut next = seats(&[1]);
        next[0].color = Some("gold".into());
        let report = engine.update(next, [1].into_iter().collect());

        assert_eq!(report.painted, vec![1]);
        let s1 = engine.host().element_by_id("s1").unwrap();
        assert!(s1.has_class(CLASS_SELECTED));
    }

    #[test]
    fn test_update_before_ready_writes_nothing() {
        let mut engine = SyncEngine::new(MemoryHost::new(), Rc::new(NoEvents));
        engine.set_source("hall.svg");
        let journal = engine.host().journal();

        let report = engine.update(seats(&[1]), SelectionSet::new());
        assert!(report.is_empty());
        assert!(journal.mutations().is_empty());
    }

    #[test]
    fn test_invalid_markup_is_an_error() {
        let mut engine = SyncEngine::new(MemoryHost::new(), Rc::new(NoEvents));
        let ticket = engine.set_source("broken.svg").unwrap();

        assert!(engine.complete_load(ticket, Ok("<html/>".into())).is_none());
        assert!(matches!(
            engine.state(),
            DiagramState::Error { error: FetchError::Markup { .. } }
        ));
        assert!(!engine.cache().contains("broken.svg"));
        assert!(engine.host().error_message().unwrap().contains("broken.svg"));
    }

    #[test]
    fn test_cached_source_skips_fetch() {
        let mut engine = ready_engine();
        assert!(engine.set_source("other.svg").is_some());

        assert!(engine.set_source("hall.svg").is_none());
        assert!(engine.state().is_ready());
    }

    #[test]
    fn test_same_source_never_reinjects() {
        let mut engine = ready_engine();
        let journal = engine.host().journal();
        journal.reset();

        assert!(engine.set_source("hall.svg").is_none());
        assert_eq!(journal.query_count(), 0);
        assert!(engine.host().pan_zoom_state().instances == 1);
    }

    #[test]
    fn test_pan_toggles_without_recreating() {
        let mut engine = ready_engine();
        engine.set_allow_pan(false);
        engine.set_allow_pan(false);

        let state = engine.host().pan_zoom_state();
        assert_eq!(state.instances, 1);
        assert!(!state.pan_enabled);

        engine.set_allow_pan(true);
        assert!(engine.host().pan_zoom_state().pan_enabled);
    }

    #[test]
    fn test_zoom_forwarding() {
        let mut engine = ready_engine();
        engine.zoom_in();
        engine.zoom_in();
        engine.zoom_out();
        assert_eq!(engine.host().pan_zoom_state().zoom_steps, 1);

        engine.reset_zoom();
        assert_eq!(engine.host().pan_zoom_state().zoom_steps, 0);
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut engine = ready_engine();
        engine.update(seats(&[1]), SelectionSet::new());
        let s1 = engine.host().element_by_id("s1").unwrap();
        assert_eq!(s1.listener_count(), 1);

        engine.unmount();
        assert_eq!(s1.listener_count(), 0);
        assert_eq!(engine.state(), &DiagramState::Idle);
        assert!(!engine.host().pan_zoom_state().active);
        assert!(engine.host().svg_root().is_none());
    }

    #[test]
    fn test_selection_only_update_does_not_rebind() {
        let mut engine = ready_engine();
        engine.update(seats(&[1, 2]), SelectionSet::new());
        let journal = engine.host().journal();
        journal.reset();

        engine.update(seats(&[1, 2]), [2].into_iter().collect());
        let touched: Vec<_> = journal
            .mutations()
            .iter()
            .map(Mutation::target)
            .map(str::to_string)
            .collect();
        assert!(touched.iter().all(|target| target == "s2"));
    }
}
