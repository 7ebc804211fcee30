//! Action bars
//!
//! The bars on either side of the diagram are plain markup re-rendered on
//! every change. Built-in buttons carry a `data-action` attribute (and
//! `data-group` for group toggles) so a single delegated click listener can
//! map a click back to a [`ControlAction`].

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::models::ControlDescriptor;

pub const ACTION_GROUP_CLASS: &str = "seatmap__action-group";
pub const ACTION_CLASS: &str = "seatmap__action";
pub const ACTION_SELECTED_CLASS: &str = "seatmap__action--selected";

/// Something a built-in control asks the widget to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    ZoomIn,
    ResetZoom,
    ZoomOut,
    ToggleGroup(String),
    ToggleDrag,
}

impl ControlAction {
    pub fn name(&self) -> &'static str {
        match self {
            ControlAction::ZoomIn => "zoom-in",
            ControlAction::ResetZoom => "reset-zoom",
            ControlAction::ZoomOut => "zoom-out",
            ControlAction::ToggleGroup(_) => "toggle-group",
            ControlAction::ToggleDrag => "toggle-drag",
        }
    }

    /// Rebuild an action from a button's `data-action` / `data-group`
    pub fn parse(name: &str, group: Option<&str>) -> Option<Self> {
        match name {
            "zoom-in" => Some(ControlAction::ZoomIn),
            "reset-zoom" => Some(ControlAction::ResetZoom),
            "zoom-out" => Some(ControlAction::ZoomOut),
            "toggle-group" => group.map(|group| ControlAction::ToggleGroup(group.to_string())),
            "toggle-drag" => Some(ControlAction::ToggleDrag),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlIcon {
    ZoomIn,
    Close,
    ZoomOut,
    Lasso,
}

impl ControlIcon {
    fn markup(self) -> &'static str {
        match self {
            ControlIcon::ZoomIn => concat!(
                r#"<svg class="seatmap__icon seatmap__icon--zoom-in" viewBox="0 0 16 16"><title>Zoom In</title>"#,
                r#"<path d="M12.8 8c0 0.442-0.038 0.8-0.481 0.8h-3.519v3.519c0 0.442-0.358 0.481-0.8 0.481s-0.8-0.039-0.8-0.481v-3.519h-3.519c-0.442 0-0.481-0.358-0.481-0.8s0.039-0.8 0.481-0.8h3.519v-3.519c0-0.442 0.358-0.481 0.8-0.481s0.8 0.038 0.8 0.481v3.519h3.519c0.442 0 0.481 0.358 0.481 0.8z"></path></svg>"#
            ),
            ControlIcon::Close => concat!(
                r#"<svg class="seatmap__icon seatmap__icon--close" viewBox="0 0 16 16"><title>Close</title>"#,
                r#"<path d="M12.656 4.281l-3.719 3.719 3.719 3.719-0.938 0.938-3.719-3.719-3.719 3.719-0.938-0.938 3.719-3.719-3.719-3.719 0.938-0.938 3.719 3.719 3.719-3.719z"></path></svg>"#
            ),
            ControlIcon::ZoomOut => concat!(
                r#"<svg class="seatmap__icon seatmap__icon--zoom-out" viewBox="0 0 16 16"><title>Zoom Out</title>"#,
                r#"<path d="M12.8 8c0 0.442-0.038 0.8-0.481 0.8h-8.638c-0.442 0-0.481-0.358-0.481-0.8s0.039-0.8 0.481-0.8h8.639c0.442 0 0.48 0.358 0.48 0.8z"></path></svg>"#
            ),
            ControlIcon::Lasso => concat!(
                r#"<svg class="seatmap__icon seatmap__icon--lasso" viewBox="0 -960 960 960"><title>Lasso select</title>"#,
                r#"<path d="m161-516-80-8q6-46 20.5-89.5T141-696l68 42q-20 31-31.5 66T161-516Zm36 316q-33-32-57-70.5T101-352l76-26q12 35 31 65.5t45 56.5l-56 56Zm110-552-42-68q39-25 82.5-39.5T437-880l8 80q-37 5-72 16.5T307-752ZM479-82q-35 0-69.5-5.5T343-106l26-76q27 9 54 14.5t56 5.5v80Zm226-626q-26-26-56.5-45T583-784l26-76q43 15 81.5 39t70.5 57l-56 56Zm86 594L679-226v104h-80v-240h240v80H735l112 112-56 56Zm8-368q0-29-5.5-56T779-592l76-26q13 32 18.5 66.5T879-482h-80Z"></path></svg>"#
            ),
        }
    }
}

/// A built-in button
#[derive(Clone, Debug, PartialEq)]
pub struct ActionButton {
    pub action: ControlAction,
    pub title: Option<String>,
    /// Text content, used when there is no icon
    pub label: Option<String>,
    pub icon: Option<ControlIcon>,
    pub selected: bool,
}

impl ActionButton {
    pub fn icon(action: ControlAction, title: &str, icon: ControlIcon) -> Self {
        Self {
            action,
            title: Some(title.to_string()),
            label: None,
            icon: Some(icon),
            selected: false,
        }
    }

    pub fn labelled(action: ControlAction, label: impl Into<String>) -> Self {
        Self {
            action,
            title: None,
            label: Some(label.into()),
            icon: None,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn render(&self, out: &mut String) {
        let _ = write!(out, r#"<button type="button" class="{}"#, ACTION_CLASS);
        if self.selected {
            let _ = write!(out, " {}", ACTION_SELECTED_CLASS);
        }
        let _ = write!(out, r#"" data-action="{}""#, self.action.name());
        if let ControlAction::ToggleGroup(group) = &self.action {
            let _ = write!(out, r#" data-group="{}""#, escape(group.as_str()));
        }
        if let Some(title) = &self.title {
            let _ = write!(out, r#" title="{}""#, escape(title.as_str()));
        }
        out.push('>');

        match (self.icon, &self.label) {
            (Some(icon), _) => out.push_str(icon.markup()),
            (None, Some(label)) => out.push_str(&escape(label.as_str())),
            (None, None) => {}
        }
        out.push_str("</button>");
    }
}

/// One `.seatmap__action-group` in a bar
#[derive(Clone, Debug, PartialEq)]
pub enum ActionGroup {
    Buttons(Vec<ActionButton>),
    /// Host markup, inserted as given
    Host(ControlDescriptor),
}

impl ActionGroup {
    fn render(&self, out: &mut String) {
        match self {
            ActionGroup::Buttons(buttons) => {
                let _ = write!(out, r#"<div class="{}">"#, ACTION_GROUP_CLASS);
                for button in buttons {
                    button.render(out);
                }
            }
            ActionGroup::Host(descriptor) => {
                match descriptor.class_hint() {
                    Some(hint) => {
                        let _ = write!(out, r#"<div class="{} {}">"#, ACTION_GROUP_CLASS, escape(hint));
                    }
                    None => {
                        let _ = write!(out, r#"<div class="{}">"#, ACTION_GROUP_CLASS);
                    }
                }
                out.push_str(descriptor.content());
            }
        }
        out.push_str("</div>");
    }
}

/// The zoom in / reset / zoom out group
pub fn zoom_controls() -> ActionGroup {
    ActionGroup::Buttons(vec![
        ActionButton::icon(ControlAction::ZoomIn, "Zoom In", ControlIcon::ZoomIn),
        ActionButton::icon(ControlAction::ResetZoom, "Reset Zoom", ControlIcon::Close),
        ActionButton::icon(ControlAction::ZoomOut, "Zoom Out", ControlIcon::ZoomOut),
    ])
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlBar {
    groups: Vec<ActionGroup>,
}

impl ControlBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: ActionGroup) {
        self.groups.push(group);
    }

    pub fn extend_host(&mut self, controls: &[ControlDescriptor]) {
        self.groups
            .extend(controls.iter().cloned().map(ActionGroup::Host));
    }

    pub fn groups(&self) -> &[ActionGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            group.render(&mut out);
        }
        out
    }
}
