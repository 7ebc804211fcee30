//! Browser DOM binding
//!
//! `WebHost` builds the widget skeleton inside a mount element and hands out
//! `WebElement` handles over `web_sys::Element`. Gesture listeners are wasm
//! closures kept in a per-host registry; the registry key is stored on the
//! element itself so any handle to the same node can find them again.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use super::{ControlSide, DiagramElement, DiagramHost, Gesture, GestureHandler, PanZoom, CONTAINER_CLASS};
use crate::error::{LookupError, MarkupError};
use crate::models::PanZoomOptions;

const LISTENER_KEY_ATTR: &str = "data-seatmap-listener";

type ListenerClosure = Closure<dyn FnMut(Event)>;

#[derive(Default)]
struct ListenerRegistry {
    next_key: Cell<u32>,
    bound: RefCell<HashMap<u32, Vec<(&'static str, ListenerClosure)>>>,
}

impl ListenerRegistry {
    fn key_for(&self, element: &Element) -> u32 {
        if let Some(key) = listener_key(element) {
            return key;
        }
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        let _ = element.set_attribute(LISTENER_KEY_ATTR, &key.to_string());
        key
    }

    fn release(&self, element: &Element) {
        let Some(key) = listener_key(element) else {
            return;
        };
        let Some(closures) = self.bound.borrow_mut().remove(&key) else {
            return;
        };
        for (event_type, closure) in &closures {
            let _ = element
                .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
        }
        retire(closures);
    }

    /// Forget every listener, for when the elements themselves are discarded
    fn release_all(&self) {
        let closures: Vec<_> = self.bound.borrow_mut().drain().flat_map(|(_, c)| c).collect();
        retire(closures);
    }
}

fn listener_key(element: &Element) -> Option<u32> {
    element
        .get_attribute(LISTENER_KEY_ATTR)
        .and_then(|value| value.parse().ok())
}

/// Drop closures on a later task; one of them may be executing right now
fn retire(closures: Vec<(&'static str, ListenerClosure)>) {
    if closures.is_empty() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        drop(closures);
    });
}

fn malformed(selector: &str, err: JsValue) -> LookupError {
    LookupError::Malformed {
        expression: selector.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// Handle to an element of a diagram mounted in the browser
#[derive(Clone)]
pub struct WebElement {
    element: Element,
    registry: Rc<ListenerRegistry>,
}

impl WebElement {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Wrap a raw element that belongs to `host`'s diagram
    pub fn from_element(host: &WebHost, element: Element) -> Self {
        Self {
            element,
            registry: Rc::clone(&host.registry),
        }
    }

    fn wrap(&self, element: Element) -> Self {
        Self {
            element,
            registry: Rc::clone(&self.registry),
        }
    }
}

impl DiagramElement for WebElement {
    fn tag_name(&self) -> String {
        self.element.tag_name()
    }

    fn matches(&self, selector: &str) -> Result<bool, LookupError> {
        self.element
            .matches(selector)
            .map_err(|err| malformed(selector, err))
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Self>, LookupError> {
        let found = self
            .element
            .query_selector(selector)
            .map_err(|err| malformed(selector, err))?;
        Ok(found.map(|element| self.wrap(element)))
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, LookupError> {
        let list = self
            .element
            .query_selector_all(selector)
            .map_err(|err| malformed(selector, err))?;
        Ok((0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.wrap(element))
            .collect())
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.element.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.element.class_list().remove_1(class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.element.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.element.remove_attribute(name);
    }

    fn add_gesture_listener(&self, handler: GestureHandler<Self>) {
        let key = self.registry.key_for(&self.element);
        let mut bound = self.registry.bound.borrow_mut();
        let entry = bound.entry(key).or_default();

        for gesture in Gesture::ALL {
            let handler = Rc::clone(&handler);
            let target = self.element.clone();
            let registry = Rc::downgrade(&self.registry);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                let element = WebElement {
                    element: target.clone(),
                    registry,
                };
                handler(gesture, &element);
            }) as Box<dyn FnMut(Event)>);

            if let Err(err) = self
                .element
                .add_event_listener_with_callback(gesture.event_type(), closure.as_ref().unchecked_ref())
            {
                log::warn!(target: "seatmap::binder", "addEventListener failed: {:?}", err);
                continue;
            }
            entry.push((gesture.event_type(), closure));
        }
    }

    fn remove_gesture_listeners(&self) {
        self.registry.release(&self.element);
    }

    fn same_node(&self, other: &Self) -> bool {
        self.element.is_same_node(Some(other.element.as_ref()))
    }
}

#[wasm_bindgen]
extern "C" {
    type SvgPanZoomInstance;

    #[wasm_bindgen(js_name = svgPanZoom, catch)]
    fn svg_pan_zoom(target: &Element, options: &JsValue) -> Result<SvgPanZoomInstance, JsValue>;

    #[wasm_bindgen(method, js_name = enablePan)]
    fn enable_pan(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method, js_name = disablePan)]
    fn disable_pan(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method, js_name = zoomIn)]
    fn zoom_in(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method, js_name = zoomOut)]
    fn zoom_out(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method)]
    fn resize(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method)]
    fn center(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method)]
    fn fit(this: &SvgPanZoomInstance);

    #[wasm_bindgen(method)]
    fn destroy(this: &SvgPanZoomInstance);
}

struct WebPanZoom {
    instance: SvgPanZoomInstance,
    destroyed: bool,
}

impl PanZoom for WebPanZoom {
    fn enable_pan(&mut self) {
        self.instance.enable_pan();
    }

    fn disable_pan(&mut self) {
        self.instance.disable_pan();
    }

    fn zoom_in(&mut self) {
        self.instance.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.instance.zoom_out();
    }

    fn reset(&mut self) {
        self.instance.resize();
        self.instance.center();
        self.instance.fit();
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.instance.destroy();
        }
    }
}

/// The widget skeleton mounted into a host page
///
/// ```text
/// div.seatmap
///   div.seatmap__actions.seatmap__actions--left
///   div.seatmap__svg
///   div.seatmap__actions.seatmap__actions--right
/// ```
pub struct WebHost {
    root: Element,
    left: Element,
    container: Element,
    right: Element,
    registry: Rc<ListenerRegistry>,
}

impl WebHost {
    pub fn mount(mount: &Element) -> Result<Self, JsValue> {
        let document = mount
            .owner_document()
            .ok_or_else(|| JsValue::from_str("Mount element is not attached to a document"))?;

        let root = document.create_element("div")?;
        root.set_class_name("seatmap");
        let left = document.create_element("div")?;
        left.set_class_name("seatmap__actions seatmap__actions--left");
        let container = document.create_element("div")?;
        container.set_class_name(CONTAINER_CLASS);
        let right = document.create_element("div")?;
        right.set_class_name("seatmap__actions seatmap__actions--right");

        root.append_child(&left)?;
        root.append_child(&container)?;
        root.append_child(&right)?;
        mount.append_child(&root)?;

        Ok(Self {
            root,
            left,
            container,
            right,
            registry: Rc::new(ListenerRegistry::default()),
        })
    }

    pub fn action_bar(&self, side: ControlSide) -> &Element {
        match side {
            ControlSide::Left => &self.left,
            ControlSide::Right => &self.right,
        }
    }

    /// Detach the skeleton from the page
    pub fn unmount(&self) {
        self.registry.release_all();
        self.root.remove();
    }
}

impl DiagramHost for WebHost {
    type Element = WebElement;

    fn container(&self) -> WebElement {
        WebElement {
            element: self.container.clone(),
            registry: Rc::clone(&self.registry),
        }
    }

    fn inject(&mut self, markup: &str) -> Result<(), MarkupError> {
        self.registry.release_all();
        self.container.set_inner_html(markup);

        let root = self.container.first_element_child();
        match root {
            Some(root) if root.tag_name().eq_ignore_ascii_case("svg") => Ok(()),
            Some(root) => {
                let tag = root.tag_name();
                self.container.set_inner_html("");
                Err(MarkupError::NotSvg(tag))
            }
            None => Err(MarkupError::InvalidXml("document has no root element".into())),
        }
    }

    fn show_error(&mut self, message: &str) {
        self.registry.release_all();
        self.container.set_inner_html("");

        let paragraph = self
            .container
            .owner_document()
            .and_then(|document| document.create_element("p").ok());
        match paragraph {
            Some(paragraph) => {
                paragraph.set_class_name("seatmap__error");
                paragraph.set_text_content(Some(message));
                let _ = self.container.append_child(&paragraph);
            }
            None => self.container.set_text_content(Some(message)),
        }
    }

    fn clear(&mut self) {
        self.registry.release_all();
        self.container.set_inner_html("");
    }

    fn attach_pan_zoom(&mut self, options: &PanZoomOptions) -> Option<Box<dyn PanZoom>> {
        let svg = self.container.query_selector("svg").ok().flatten()?;

        let options = match serde_wasm_bindgen::to_value(options) {
            Ok(options) => options,
            Err(err) => {
                log::error!(target: "seatmap::sync", "Pan/zoom options: {}", err);
                return None;
            }
        };

        match svg_pan_zoom(&svg, &options) {
            Ok(instance) => Some(Box::new(WebPanZoom {
                instance,
                destroyed: false,
            })),
            Err(err) => {
                log::warn!(target: "seatmap::sync", "svgPanZoom unavailable: {:?}", err);
                None
            }
        }
    }

    fn render_controls(&mut self, side: ControlSide, markup: &str) {
        self.action_bar(side).set_inner_html(markup);
    }
}
