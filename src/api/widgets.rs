//! Widget handles exported to JavaScript
//!
//! Each class owns a widget mounted into a host element. Widgets live in
//! `Rc<RefCell<..>>`: the diagram fetch and the action-bar click listener
//! reach them through weak references, and no borrow is held while a host
//! callback runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use super::callbacks::{change_handler, click_handler, JsGroupedSeatEvents, JsSeatEvents};
use super::helpers;
use crate::controls::ControlAction;
use crate::dom::{ControlSide, WebElement, WebHost};
use crate::grouping::GroupedSeatmap;
use crate::seatmap::{Seatmap, SeatmapWidget};
use crate::sync::{fetch_diagram, LoadTicket};
use crate::wrappers::{SeatmapAccordion, SeatmapInput};

type ClickListener = Closure<dyn FnMut(Event)>;

/// A widget mounted in the page, plus the listeners wiring its action bars
struct Mounted<W: SeatmapWidget<Host = WebHost> + 'static> {
    widget: Rc<RefCell<W>>,
    listeners: Vec<(Element, ClickListener)>,
    destroyed: bool,
}

impl<W> Mounted<W>
where
    W: SeatmapWidget<Host = WebHost> + 'static,
    W::Props: DeserializeOwned,
{
    fn new(widget: W, props: JsValue) -> Result<Self, JsValue> {
        let mut mounted = Self {
            widget: Rc::new(RefCell::new(widget)),
            listeners: Vec::new(),
            destroyed: false,
        };
        for side in [ControlSide::Left, ControlSide::Right] {
            let bar = mounted.widget.borrow().host().action_bar(side).clone();
            let listener = listen_for_controls(Rc::downgrade(&mounted.widget), &bar)?;
            mounted.listeners.push((bar, listener));
        }
        // Dropping a half-built handle unmounts it again
        mounted.update(props)?;
        Ok(mounted)
    }

    fn update(&self, props: JsValue) -> Result<(), JsValue> {
        let props: W::Props = helpers::deserialize(props, "Invalid seatmap props")?;
        let outcome = self.widget.borrow_mut().update(props);
        if let Some(ticket) = outcome.ticket {
            spawn_load(Rc::downgrade(&self.widget), ticket);
        }
        Ok(())
    }
}

impl<W: SeatmapWidget<Host = WebHost> + 'static> Mounted<W> {
    fn perform(&self, action: ControlAction) -> bool {
        self.widget.borrow_mut().perform(&action)
    }

    fn state(&self) -> String {
        self.widget.borrow().state().name().to_string()
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for (bar, listener) in self.listeners.drain(..) {
            let _ = bar.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
        }
        let mut widget = self.widget.borrow_mut();
        widget.unmount();
        widget.host().unmount();
    }
}

impl<W: SeatmapWidget<Host = WebHost> + 'static> Drop for Mounted<W> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn spawn_load<W>(widget: Weak<RefCell<W>>, ticket: LoadTicket)
where
    W: SeatmapWidget + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_diagram(ticket.url()).await;
        if let Some(widget) = widget.upgrade() {
            widget.borrow_mut().complete_load(ticket, result);
        }
    });
}

fn listen_for_controls<W>(widget: Weak<RefCell<W>>, bar: &Element) -> Result<ClickListener, JsValue>
where
    W: SeatmapWidget + 'static,
{
    let listener = Closure::wrap(Box::new(move |event: Event| {
        let Some(action) = clicked_action(&event) else {
            return;
        };
        if let Some(widget) = widget.upgrade() {
            widget.borrow_mut().perform(&action);
        }
    }) as Box<dyn FnMut(Event)>);

    bar.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

fn clicked_action(event: &Event) -> Option<ControlAction> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest("[data-action]").ok()??;
    let name = button.get_attribute("data-action")?;
    ControlAction::parse(&name, button.get_attribute("data-group").as_deref())
}

fn elements(host: &WebHost, array: &Array) -> Vec<WebElement> {
    array
        .iter()
        .filter_map(|value| value.dyn_into::<Element>().ok())
        .map(|element| WebElement::from_element(host, element))
        .collect()
}

/// Widgets built on the grouped seatmap
trait Grouping {
    fn grouping(&self) -> &GroupedSeatmap<WebHost>;
    fn grouping_mut(&mut self) -> &mut GroupedSeatmap<WebHost>;
}

impl Grouping for GroupedSeatmap<WebHost> {
    fn grouping(&self) -> &GroupedSeatmap<WebHost> {
        self
    }

    fn grouping_mut(&mut self) -> &mut GroupedSeatmap<WebHost> {
        self
    }
}

impl Grouping for SeatmapInput<WebHost> {
    fn grouping(&self) -> &GroupedSeatmap<WebHost> {
        self.grouped()
    }

    fn grouping_mut(&mut self) -> &mut GroupedSeatmap<WebHost> {
        self.grouped_mut()
    }
}

impl<W> Mounted<W>
where
    W: SeatmapWidget<Host = WebHost> + Grouping + 'static,
    W::Props: DeserializeOwned,
{
    fn lasso_options(&self) -> Result<JsValue, JsValue> {
        let widget = self.widget.borrow();
        match widget.grouping().lasso_options() {
            Some(options) => helpers::serialize(options, "Lasso options"),
            None => Ok(JsValue::NULL),
        }
    }

    fn drag_select(&self, added: &Array, removed: &Array) {
        let mut widget = self.widget.borrow_mut();
        let grouping = widget.grouping_mut();
        let added = elements(grouping.host(), added);
        let removed = elements(grouping.host(), removed);
        grouping.drag_select(&added, &removed);
    }

    fn drag_select_end(&self, added: &Array) {
        let (batch, events) = {
            let mut widget = self.widget.borrow_mut();
            let grouping = widget.grouping_mut();
            let added = elements(grouping.host(), added);
            (grouping.collect_drag_selection(&added), grouping.events())
        };
        if !batch.is_empty() {
            events.seats_selected(&batch);
        }
    }
}

fn mount_point(mount: &Element) -> Result<WebHost, JsValue> {
    WebHost::mount(mount).map_err(|err| helpers::js_error(format!("Cannot mount seatmap: {:?}", err)))
}

/// Seatmap painting plain seat records
#[wasm_bindgen(js_name = Seatmap)]
pub struct JsSeatmap {
    inner: Mounted<Seatmap<WebHost>>,
}

#[wasm_bindgen(js_class = Seatmap)]
impl JsSeatmap {
    #[wasm_bindgen(constructor)]
    pub fn new(mount: &Element, props: JsValue, callbacks: JsValue) -> Result<JsSeatmap, JsValue> {
        let events = Rc::new(JsSeatEvents::from_object(&callbacks));
        let widget = Seatmap::new(mount_point(mount)?, events);
        Ok(Self {
            inner: Mounted::new(widget, props)?,
        })
    }

    pub fn update(&self, props: JsValue) -> Result<(), JsValue> {
        self.inner.update(props)
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.inner.perform(ControlAction::ZoomIn);
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.inner.perform(ControlAction::ZoomOut);
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        self.inner.perform(ControlAction::ResetZoom);
    }

    /// `idle`, `loading`, `painting`, `ready` or `error`
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}

/// Seatmap with group and lasso selection
#[wasm_bindgen(js_name = GroupedSeatmap)]
pub struct JsGroupedSeatmap {
    inner: Mounted<GroupedSeatmap<WebHost>>,
}

#[wasm_bindgen(js_class = GroupedSeatmap)]
impl JsGroupedSeatmap {
    #[wasm_bindgen(constructor)]
    pub fn new(mount: &Element, props: JsValue, callbacks: JsValue) -> Result<JsGroupedSeatmap, JsValue> {
        let events = Rc::new(JsGroupedSeatEvents::from_object(&callbacks));
        let widget = GroupedSeatmap::new(mount_point(mount)?, events);
        Ok(Self {
            inner: Mounted::new(widget, props)?,
        })
    }

    pub fn update(&self, props: JsValue) -> Result<(), JsValue> {
        self.inner.update(props)
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.inner.perform(ControlAction::ZoomIn);
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.inner.perform(ControlAction::ZoomOut);
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        self.inner.perform(ControlAction::ResetZoom);
    }

    #[wasm_bindgen(js_name = toggleGroup)]
    pub fn toggle_group(&self, group: &str) -> bool {
        self.inner.perform(ControlAction::ToggleGroup(group.to_string()))
    }

    #[wasm_bindgen(js_name = toggleDrag)]
    pub fn toggle_drag(&self) -> bool {
        self.inner.perform(ControlAction::ToggleDrag)
    }

    /// Options for the lasso library, or `null` outside drag selection
    #[wasm_bindgen(js_name = lassoOptions)]
    pub fn lasso_options(&self) -> Result<JsValue, JsValue> {
        self.inner.lasso_options()
    }

    /// Lasso moved: `added` / `removed` are the elements it now (un)covers
    #[wasm_bindgen(js_name = dragSelect)]
    pub fn drag_select(&self, added: &Array, removed: &Array) {
        self.inner.drag_select(added, removed);
    }

    #[wasm_bindgen(js_name = dragSelectEnd)]
    pub fn drag_select_end(&self, added: &Array) {
        self.inner.drag_select_end(added);
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}

/// Seat picker behaving like a controlled form input
#[wasm_bindgen(js_name = SeatmapInput)]
pub struct JsSeatmapInput {
    inner: Mounted<SeatmapInput<WebHost>>,
}

#[wasm_bindgen(js_class = SeatmapInput)]
impl JsSeatmapInput {
    #[wasm_bindgen(constructor)]
    pub fn new(mount: &Element, props: JsValue, callbacks: JsValue) -> Result<JsSeatmapInput, JsValue> {
        let widget = SeatmapInput::new(mount_point(mount)?, change_handler(&callbacks));
        Ok(Self {
            inner: Mounted::new(widget, props)?,
        })
    }

    pub fn update(&self, props: JsValue) -> Result<(), JsValue> {
        self.inner.update(props)
    }

    #[wasm_bindgen(js_name = lassoOptions)]
    pub fn lasso_options(&self) -> Result<JsValue, JsValue> {
        self.inner.lasso_options()
    }

    #[wasm_bindgen(js_name = dragSelect)]
    pub fn drag_select(&self, added: &Array, removed: &Array) {
        self.inner.drag_select(added, removed);
    }

    #[wasm_bindgen(js_name = dragSelectEnd)]
    pub fn drag_select_end(&self, added: &Array) {
        self.inner.drag_select_end(added);
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}

/// Seatmap where one seat at a time is open
#[wasm_bindgen(js_name = SeatmapAccordion)]
pub struct JsSeatmapAccordion {
    inner: Mounted<SeatmapAccordion<WebHost>>,
}

#[wasm_bindgen(js_class = SeatmapAccordion)]
impl JsSeatmapAccordion {
    #[wasm_bindgen(constructor)]
    pub fn new(mount: &Element, props: JsValue, callbacks: JsValue) -> Result<JsSeatmapAccordion, JsValue> {
        let widget = SeatmapAccordion::new(mount_point(mount)?, click_handler(&callbacks));
        Ok(Self {
            inner: Mounted::new(widget, props)?,
        })
    }

    pub fn update(&self, props: JsValue) -> Result<(), JsValue> {
        self.inner.update(props)
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}
