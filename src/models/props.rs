//! Host → core props
//!
//! Every update from the host is a full snapshot of these structs. Field
//! names are camelCase on the JavaScript side; flags default the way the
//! widget behaves when the host leaves them out.

use serde::{Deserialize, Serialize};

use super::seat::{DisplayGroupMapping, GroupedSeat, Seat, SeatDisplay, SeatId};

fn default_true() -> bool {
    true
}

/// Host-supplied control rendered in one of the action bars
///
/// Either bare markup, or markup with a class hint for the wrapping group.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ControlDescriptor {
    Markup(String),
    Styled {
        content: String,
        #[serde(default, rename = "className")]
        class_name: Option<String>,
    },
}

impl ControlDescriptor {
    pub fn content(&self) -> &str {
        match self {
            ControlDescriptor::Markup(content) => content,
            ControlDescriptor::Styled { content, .. } => content,
        }
    }

    pub fn class_hint(&self) -> Option<&str> {
        match self {
            ControlDescriptor::Markup(_) => None,
            ControlDescriptor::Styled { class_name, .. } => class_name.as_deref(),
        }
    }
}

/// Props of the raw seatmap
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatmapProps {
    #[serde(default)]
    pub available_seats: Vec<SeatDisplay>,

    #[serde(default)]
    pub selected_seat_ids: Vec<SeatId>,

    /// Diagram source URL
    pub svg: String,

    #[serde(default = "default_true")]
    pub allow_drag_and_pan: bool,

    #[serde(default = "default_true")]
    pub show_zoom_controls: bool,

    #[serde(default)]
    pub left_controls: Vec<ControlDescriptor>,

    #[serde(default)]
    pub right_controls: Vec<ControlDescriptor>,
}

impl SeatmapProps {
    pub fn new(svg: impl Into<String>) -> Self {
        Self {
            available_seats: Vec::new(),
            selected_seat_ids: Vec::new(),
            svg: svg.into(),
            allow_drag_and_pan: true,
            show_zoom_controls: true,
            left_controls: Vec::new(),
            right_controls: Vec::new(),
        }
    }
}

/// Props of the grouped seatmap
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSeatmapProps {
    #[serde(default)]
    pub available_seats: Vec<GroupedSeat>,

    #[serde(default)]
    pub selected_seat_ids: Vec<SeatId>,

    pub svg: String,

    #[serde(default)]
    pub display_group_mapping: DisplayGroupMapping,

    #[serde(default)]
    pub left_controls: Vec<ControlDescriptor>,

    #[serde(default)]
    pub right_controls: Vec<ControlDescriptor>,

    #[serde(default = "default_true")]
    pub show_zoom_controls: bool,

    #[serde(default = "default_true")]
    pub with_group_selection: bool,

    #[serde(default = "default_true")]
    pub with_drag_selection: bool,
}

impl GroupedSeatmapProps {
    pub fn new(svg: impl Into<String>) -> Self {
        Self {
            available_seats: Vec::new(),
            selected_seat_ids: Vec::new(),
            svg: svg.into(),
            display_group_mapping: DisplayGroupMapping::new(),
            left_controls: Vec::new(),
            right_controls: Vec::new(),
            show_zoom_controls: true,
            with_group_selection: true,
            with_drag_selection: true,
        }
    }
}

/// Props of the form-input wrapper
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatmapInputProps {
    #[serde(default)]
    pub seats: Vec<Seat>,

    /// Currently selected seat IDs, in the order they were picked
    #[serde(default)]
    pub value: Vec<SeatId>,

    pub svg: String,

    #[serde(default)]
    pub display_group_mapping: DisplayGroupMapping,

    #[serde(default)]
    pub left_controls: Vec<ControlDescriptor>,

    #[serde(default)]
    pub right_controls: Vec<ControlDescriptor>,

    #[serde(default = "default_true")]
    pub with_group_selection: bool,

    #[serde(default = "default_true")]
    pub with_drag_selection: bool,
}

/// Props of the accordion wrapper
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatmapAccordionProps {
    #[serde(default)]
    pub seats: Vec<Seat>,

    #[serde(default)]
    pub selected_seat_ids: Vec<SeatId>,

    pub svg: String,

    #[serde(default)]
    pub display_group_mapping: DisplayGroupMapping,

    #[serde(default)]
    pub left_controls: Vec<ControlDescriptor>,

    #[serde(default)]
    pub right_controls: Vec<ControlDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_default_on() {
        let props: GroupedSeatmapProps = serde_json::from_str(r#"{"svg": "venue.svg"}"#).unwrap();
        assert!(props.with_group_selection);
        assert!(props.with_drag_selection);
        assert!(props.show_zoom_controls);
        assert!(props.available_seats.is_empty());

        let raw: SeatmapProps = serde_json::from_str(r#"{"svg": "venue.svg"}"#).unwrap();
        assert!(raw.allow_drag_and_pan);
    }

    #[test]
    fn test_control_descriptor_shapes() {
        let controls: Vec<ControlDescriptor> = serde_json::from_str(
            r#"["<b>Legend</b>", {"content": "<i>Help</i>", "className": "help"}]"#,
        )
        .unwrap();

        assert_eq!(controls[0].content(), "<b>Legend</b>");
        assert_eq!(controls[0].class_hint(), None);
        assert_eq!(controls[1].content(), "<i>Help</i>");
        assert_eq!(controls[1].class_hint(), Some("help"));
    }
}
