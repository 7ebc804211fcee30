//! Host callbacks passed in from JavaScript
//!
//! Callbacks are read once from the object given at construction. Missing
//! or non-function entries are ignored; a callback that throws is logged and
//! does not disturb the widget.

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use super::helpers;
use crate::grouping::GroupedSeatEvents;
use crate::models::{GroupedSeat, SeatDisplay, SeatId};
use crate::sync::SeatEvents;
use crate::wrappers::{ChangeHandler, ClickHandler};

fn callback(callbacks: &JsValue, name: &str) -> Option<Function> {
    if !callbacks.is_object() {
        return None;
    }
    Reflect::get(callbacks, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn report(name: &str, result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        log::error!(target: "seatmap::api", "{} threw: {:?}", name, err);
    }
}

fn emit<T: Serialize + ?Sized>(function: &Option<Function>, name: &str, payload: &T) {
    let Some(function) = function else {
        return;
    };
    if let Ok(payload) = helpers::serialize(payload, name) {
        report(name, function.call1(&JsValue::NULL, &payload));
    }
}

/// `onSeatSelect`, `onSeatDeselect`, `onSeatHover`, `onSeatHoverEnd`, each
/// called with one seat
pub struct JsSeatEvents {
    on_select: Option<Function>,
    on_deselect: Option<Function>,
    on_hover: Option<Function>,
    on_hover_end: Option<Function>,
}

impl JsSeatEvents {
    pub fn from_object(callbacks: &JsValue) -> Self {
        Self {
            on_select: callback(callbacks, "onSeatSelect"),
            on_deselect: callback(callbacks, "onSeatDeselect"),
            on_hover: callback(callbacks, "onSeatHover"),
            on_hover_end: callback(callbacks, "onSeatHoverEnd"),
        }
    }
}

impl SeatEvents for JsSeatEvents {
    fn seat_selected(&self, seat: &SeatDisplay) {
        emit(&self.on_select, "onSeatSelect", seat);
    }

    fn seat_deselected(&self, seat: &SeatDisplay) {
        emit(&self.on_deselect, "onSeatDeselect", seat);
    }

    fn seat_hovered(&self, seat: &SeatDisplay) {
        emit(&self.on_hover, "onSeatHover", seat);
    }

    fn seat_hover_ended(&self, seat: &SeatDisplay) {
        emit(&self.on_hover_end, "onSeatHoverEnd", seat);
    }
}

/// Same callback names as [`JsSeatEvents`]; select/deselect receive arrays
pub struct JsGroupedSeatEvents {
    on_select: Option<Function>,
    on_deselect: Option<Function>,
    on_hover: Option<Function>,
    on_hover_end: Option<Function>,
}

impl JsGroupedSeatEvents {
    pub fn from_object(callbacks: &JsValue) -> Self {
        Self {
            on_select: callback(callbacks, "onSeatSelect"),
            on_deselect: callback(callbacks, "onSeatDeselect"),
            on_hover: callback(callbacks, "onSeatHover"),
            on_hover_end: callback(callbacks, "onSeatHoverEnd"),
        }
    }
}

impl GroupedSeatEvents for JsGroupedSeatEvents {
    fn seats_selected(&self, seats: &[GroupedSeat]) {
        emit(&self.on_select, "onSeatSelect", seats);
    }

    fn seats_deselected(&self, seats: &[GroupedSeat]) {
        emit(&self.on_deselect, "onSeatDeselect", seats);
    }

    fn seat_hovered(&self, seat: &GroupedSeat) {
        emit(&self.on_hover, "onSeatHover", seat);
    }

    fn seat_hover_ended(&self, seat: &GroupedSeat) {
        emit(&self.on_hover_end, "onSeatHoverEnd", seat);
    }
}

/// `onChange(value)` for the form input
pub fn change_handler(callbacks: &JsValue) -> ChangeHandler {
    let on_change = callback(callbacks, "onChange");
    std::rc::Rc::new(move |value: Vec<SeatId>| {
        emit(&on_change, "onChange", &value);
    })
}

/// `onClick(seatId, selected)` for the accordion
pub fn click_handler(callbacks: &JsValue) -> ClickHandler {
    let on_click = callback(callbacks, "onClick");
    std::rc::Rc::new(move |id: SeatId, selected: bool| {
        if let Some(function) = &on_click {
            report(
                "onClick",
                function.call2(&JsValue::NULL, &JsValue::from(id), &JsValue::from(selected)),
            );
        }
    })
}
