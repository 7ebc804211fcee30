//! Shared helpers for the JavaScript surface
//!
//! Serialization in both directions, error conversion to `JsValue`, and the
//! log-level switch exposed to hosts.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

/// Serialize a value to plain JavaScript objects and arrays
pub fn serialize<T: Serialize + ?Sized>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Log an error and convert it to a JsValue
pub fn js_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    log::error!(target: "seatmap::api", "{}", msg);
    JsValue::from_str(&msg)
}

// ============================================================================
// Logging
// ============================================================================

/// Parse a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`)
pub fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.trim().parse().ok()
}

/// Change how much the widget logs to the console
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).ok_or_else(|| js_error(format!("Unknown log level '{}'", level)))?;
    log::set_max_level(filter);
    Ok(())
}
