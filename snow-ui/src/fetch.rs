//! Browser-side CSV fetch and refresh timer.

use snow_core::fetch::{check_body, FetchError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

fn js_error(e: wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// GET `url` and return the response body as text.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Request("no window".to_string()))?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| FetchError::Request(js_error(e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| FetchError::Request(js_error(e)))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = response.text().map_err(|e| FetchError::Body(js_error(e)))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| FetchError::Body(js_error(e)))?;
    let body = text
        .as_string()
        .ok_or_else(|| FetchError::Body("response body is not text".to_string()))?;
    check_body(body)
}

/// Fetch `url`, log the outcome, and shape it for a `DataArrived` event.
pub async fn fetch_csv(url: &str) -> Result<String, String> {
    log::info!("Fetching {}", url);
    match fetch_text(url).await {
        Ok(body) => {
            log::info!("Fetched {} bytes from {}", body.len(), url);
            Ok(body)
        }
        Err(e) => {
            log::error!("Fetch of {} failed: {}", url, e);
            Err(e.to_string())
        }
    }
}

/// Resolve after `ms` milliseconds using `setTimeout`.
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
                if window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
                    .is_err()
                {
                    let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
                }
            }
            None => {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}
