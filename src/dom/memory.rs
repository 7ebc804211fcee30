//! In-memory SVG diagram
//!
//! A small element tree built from diagram markup with roxmltree. It behaves
//! like the browser DOM as far as the binder cares (shared handles, class
//! lists, attributes, gesture listeners) and journals every write so callers
//! can see exactly which elements a reconcile touched.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use roxmltree::{Document as XmlDocument, ParsingOptions};

use super::selector::{Selector, SelectorSubject};
use super::{ControlSide, DiagramElement, DiagramHost, Gesture, GestureHandler, PanZoom, CONTAINER_CLASS};
use crate::error::{LookupError, MarkupError};
use crate::models::PanZoomOptions;

/// One write made to the diagram
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    AddClass { target: String, class: String },
    RemoveClass { target: String, class: String },
    SetAttribute { target: String, name: String, value: String },
    RemoveAttribute { target: String, name: String },
}

impl Mutation {
    /// `id` of the written element, or its tag name when it has none
    pub fn target(&self) -> &str {
        match self {
            Mutation::AddClass { target, .. }
            | Mutation::RemoveClass { target, .. }
            | Mutation::SetAttribute { target, .. }
            | Mutation::RemoveAttribute { target, .. } => target,
        }
    }
}

/// Record of writes and lookups made against one diagram
#[derive(Debug, Default)]
pub struct MutationJournal {
    mutations: RefCell<Vec<Mutation>>,
    queries: Cell<usize>,
}

impl MutationJournal {
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }

    /// Drain the journal, keeping the query counter
    pub fn take(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.mutations.borrow_mut())
    }

    /// Distinct targets written since the last `take`/`reset`
    pub fn touched(&self) -> BTreeSet<String> {
        self.mutations
            .borrow()
            .iter()
            .map(|m| m.target().to_string())
            .collect()
    }

    /// Number of selector evaluations made so far
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    pub fn reset(&self) {
        self.mutations.borrow_mut().clear();
        self.queries.set(0);
    }

    fn record(&self, mutation: Mutation) {
        self.mutations.borrow_mut().push(mutation);
    }

    fn count_query(&self) {
        self.queries.set(self.queries.get() + 1);
    }
}

struct Node {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    text: RefCell<Option<String>>,
    children: RefCell<Vec<MemoryElement>>,
    parent: RefCell<Weak<Node>>,
    listeners: RefCell<Vec<GestureHandler<MemoryElement>>>,
    journal: Rc<MutationJournal>,
}

/// Shared handle to an in-memory element
#[derive(Clone)]
pub struct MemoryElement(Rc<Node>);

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.0.tag)?;
        if let Some(id) = self.attribute("id") {
            write!(f, " id=\"{}\"", id)?;
        }
        write!(f, ">")
    }
}

impl MemoryElement {
    pub fn new(tag: impl Into<String>, journal: Rc<MutationJournal>) -> Self {
        MemoryElement(Rc::new(Node {
            tag: tag.into(),
            attributes: RefCell::new(Vec::new()),
            text: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            listeners: RefCell::new(Vec::new()),
            journal,
        }))
    }

    /// Build an element tree from XML markup
    pub fn parse(markup: &str, journal: Rc<MutationJournal>) -> Result<Self, MarkupError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = XmlDocument::parse_with_options(markup, options)
            .map_err(|e| MarkupError::InvalidXml(e.to_string()))?;
        Ok(Self::from_xml(doc.root_element(), &journal))
    }

    fn from_xml(node: roxmltree::Node, journal: &Rc<MutationJournal>) -> Self {
        let element = MemoryElement::new(node.tag_name().name(), Rc::clone(journal));
        {
            let mut attributes = element.0.attributes.borrow_mut();
            for attr in node.attributes() {
                attributes.push((attr.name().to_string(), attr.value().to_string()));
            }
        }

        let text: String = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect();
        if !text.trim().is_empty() {
            *element.0.text.borrow_mut() = Some(text.trim().to_string());
        }

        for child in node.children().filter(|child| child.is_element()) {
            element.append_child(Self::from_xml(child, journal));
        }
        element
    }

    pub fn append_child(&self, child: MemoryElement) {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child);
    }

    pub fn remove_children(&self) {
        for child in self.0.children.borrow_mut().drain(..) {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<MemoryElement> {
        self.0.parent.borrow().upgrade().map(MemoryElement)
    }

    pub fn text_content(&self) -> Option<String> {
        self.0.text.borrow().clone()
    }

    pub fn set_text_content(&self, text: impl Into<String>) {
        *self.0.text.borrow_mut() = Some(text.into());
    }

    /// All descendants in document order, excluding `self`
    pub fn descendants(&self) -> Vec<MemoryElement> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<MemoryElement>) {
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Descendant with the given `id`, found without counting as a lookup
    pub fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.descendants()
            .into_iter()
            .find(|el| el.attribute("id").as_deref() == Some(id))
    }

    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Fire `gesture` at this element, as the browser would on user input
    pub fn dispatch(&self, gesture: Gesture) {
        // Handlers may rebind listeners while running
        let handlers: Vec<_> = self.0.listeners.borrow().iter().cloned().collect();
        for handler in handlers {
            handler(gesture, self);
        }
    }

    fn label(&self) -> String {
        self.attribute("id").unwrap_or_else(|| self.0.tag.clone())
    }

    fn write_attribute(&self, name: &str, value: String) {
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => attributes.push((name.to_string(), value)),
        }
    }

    fn parse_selector(&self, selector: &str) -> Result<Selector, LookupError> {
        self.0.journal.count_query();
        Selector::parse(selector)
    }
}

impl SelectorSubject for MemoryElement {
    fn local_name(&self) -> String {
        self.0.tag.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attribute(name)
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent()
    }
}

impl DiagramElement for MemoryElement {
    fn tag_name(&self) -> String {
        self.0.tag.clone()
    }

    fn matches(&self, selector: &str) -> Result<bool, LookupError> {
        let selector = self.parse_selector(selector)?;
        Ok(selector.matches(self))
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Self>, LookupError> {
        let selector = self.parse_selector(selector)?;
        Ok(self.descendants().into_iter().find(|el| selector.matches(el)))
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, LookupError> {
        let selector = self.parse_selector(selector)?;
        Ok(self
            .descendants()
            .into_iter()
            .filter(|el| selector.matches(el))
            .collect())
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        self.0.journal.record(Mutation::AddClass {
            target: self.label(),
            class: class.to_string(),
        });
        let mut classes = self.classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.write_attribute("class", classes.join(" "));
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.journal.record(Mutation::RemoveClass {
            target: self.label(),
            class: class.to_string(),
        });
        let classes = self.classes();
        if classes.iter().any(|c| c == class) {
            let kept: Vec<_> = classes.into_iter().filter(|c| c != class).collect();
            self.write_attribute("class", kept.join(" "));
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0.journal.record(Mutation::SetAttribute {
            target: self.label(),
            name: name.to_string(),
            value: value.to_string(),
        });
        self.write_attribute(name, value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.0.journal.record(Mutation::RemoveAttribute {
            target: self.label(),
            name: name.to_string(),
        });
        self.0
            .attributes
            .borrow_mut()
            .retain(|(existing, _)| existing != name);
    }

    fn add_gesture_listener(&self, handler: GestureHandler<Self>) {
        self.0.listeners.borrow_mut().push(handler);
    }

    fn remove_gesture_listeners(&self) {
        self.0.listeners.borrow_mut().clear();
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Observable state of the pan/zoom instances a `MemoryHost` handed out
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanZoomState {
    /// Instances created over the host's lifetime
    pub instances: usize,
    /// An instance is currently bound and not destroyed
    pub active: bool,
    pub pan_enabled: bool,
    /// Net zoom steps (in minus out) since the last reset
    pub zoom_steps: i32,
    pub resets: usize,
}

struct MemoryPanZoom {
    state: Rc<RefCell<PanZoomState>>,
    destroyed: bool,
}

impl PanZoom for MemoryPanZoom {
    fn enable_pan(&mut self) {
        self.state.borrow_mut().pan_enabled = true;
    }

    fn disable_pan(&mut self) {
        self.state.borrow_mut().pan_enabled = false;
    }

    fn zoom_in(&mut self) {
        self.state.borrow_mut().zoom_steps += 1;
    }

    fn zoom_out(&mut self) {
        self.state.borrow_mut().zoom_steps -= 1;
    }

    fn reset(&mut self) {
        let mut state = self.state.borrow_mut();
        state.zoom_steps = 0;
        state.resets += 1;
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.state.borrow_mut().active = false;
        }
    }
}

/// Diagram host backed by an in-memory element tree
pub struct MemoryHost {
    journal: Rc<MutationJournal>,
    container: MemoryElement,
    error: Option<String>,
    left_controls: String,
    right_controls: String,
    pan_zoom: Rc<RefCell<PanZoomState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let journal = Rc::new(MutationJournal::default());
        let container = MemoryElement::new("div", Rc::clone(&journal));
        container.write_attribute("class", CONTAINER_CLASS.to_string());

        Self {
            journal,
            container,
            error: None,
            left_controls: String::new(),
            right_controls: String::new(),
            pan_zoom: Rc::new(RefCell::new(PanZoomState::default())),
        }
    }

    pub fn journal(&self) -> Rc<MutationJournal> {
        Rc::clone(&self.journal)
    }

    /// Text of the visible error message, if one is shown
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn controls(&self, side: ControlSide) -> &str {
        match side {
            ControlSide::Left => &self.left_controls,
            ControlSide::Right => &self.right_controls,
        }
    }

    pub fn pan_zoom_state(&self) -> PanZoomState {
        self.pan_zoom.borrow().clone()
    }

    /// Root `<svg>` of the injected diagram
    pub fn svg_root(&self) -> Option<MemoryElement> {
        self.container
            .children()
            .into_iter()
            .find(|child| child.0.tag == "svg")
    }

    pub fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.container.element_by_id(id)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramHost for MemoryHost {
    type Element = MemoryElement;

    fn container(&self) -> MemoryElement {
        self.container.clone()
    }

    fn inject(&mut self, markup: &str) -> Result<(), MarkupError> {
        let root = MemoryElement::parse(markup, Rc::clone(&self.journal))?;
        if root.0.tag != "svg" {
            return Err(MarkupError::NotSvg(root.0.tag.clone()));
        }
        self.container.remove_children();
        self.container.append_child(root);
        self.error = None;
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        self.container.remove_children();
        let paragraph = MemoryElement::new("p", Rc::clone(&self.journal));
        paragraph.write_attribute("class", "seatmap__error".to_string());
        paragraph.set_text_content(message);
        self.container.append_child(paragraph);
        self.error = Some(message.to_string());
    }

    fn clear(&mut self) {
        self.container.remove_children();
        self.error = None;
    }

    fn attach_pan_zoom(&mut self, options: &PanZoomOptions) -> Option<Box<dyn PanZoom>> {
        self.svg_root()?;
        {
            let mut state = self.pan_zoom.borrow_mut();
            state.instances += 1;
            state.active = true;
            state.pan_enabled = options.pan_enabled;
            state.zoom_steps = 0;
        }
        Some(Box::new(MemoryPanZoom {
            state: Rc::clone(&self.pan_zoom),
            destroyed: false,
        }))
    }

    fn render_controls(&mut self, side: ControlSide, markup: &str) {
        match side {
            ControlSide::Left => self.left_controls = markup.to_string(),
            ControlSide::Right => self.right_controls = markup.to_string(),
        }
    }
}
