//! Diagram download in the browser

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::FetchError;

fn network(url: &str, err: JsValue) -> FetchError {
    FetchError::Network {
        url: url.to_string(),
        message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// GET `url` and return its body; any non-success status is an error
pub async fn fetch_diagram(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network {
        url: url.to_string(),
        message: "no window".into(),
    })?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|err| network(url, err))?;
    let response: Response = response.dyn_into().map_err(|err| network(url, err))?;

    if !response.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response.text().map_err(|err| network(url, err))?;
    let body = JsFuture::from(body).await.map_err(|err| network(url, err))?;
    body.as_string().ok_or_else(|| FetchError::Markup {
        url: url.to_string(),
        message: "response body is not text".into(),
    })
}
