//! Options handed to the external gesture collaborators
//!
//! The pan/zoom and lasso libraries are configured from these structs; the
//! defaults are the values the widget has always shipped with.

use serde::{Deserialize, Serialize};

/// Pan/zoom library configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanZoomOptions {
    pub dbl_click_zoom_enabled: bool,
    pub mouse_wheel_zoom_enabled: bool,
    pub zoom_scale_sensitivity: f64,
    pub pan_enabled: bool,
}

impl Default for PanZoomOptions {
    fn default() -> Self {
        Self {
            dbl_click_zoom_enabled: false,
            mouse_wheel_zoom_enabled: true,
            zoom_scale_sensitivity: 0.5,
            pan_enabled: true,
        }
    }
}

/// Drag-lasso library configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LassoOptions {
    /// Only currently available seats can be lassoed
    pub selectable_targets: Vec<String>,
    pub select_by_click: bool,
    pub select_from_inside: bool,
    pub continue_select: bool,
    /// Modifier key that toggles additive selection
    pub toggle_continue_select: String,
    /// Percentage of a target that must be covered to count as hit
    pub hit_rate: u8,
}

impl Default for LassoOptions {
    fn default() -> Self {
        Self {
            selectable_targets: vec![".seatmap__svg .seat--available".to_string()],
            select_by_click: false,
            select_from_inside: true,
            continue_select: true,
            toggle_continue_select: "shift".to_string(),
            hit_rate: 100,
        }
    }
}
