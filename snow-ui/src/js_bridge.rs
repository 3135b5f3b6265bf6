//! Typed wrappers around the Mapbox glue script via `js_sys::eval()`.
//!
//! `assets/js/resort-map.js` is embedded at compile time and evaluated at
//! global scope once `mapboxgl` has loaded. Marker pointer events come back to
//! Rust through a `wasm-bindgen` closure stored on `window.__snowMarkerEvent`.

use snow_core::config::MapView;
use snow_data::map::MarkerSet;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

static RESORT_MAP_JS: &str = include_str!("../assets/js/resort-map.js");

/// Name of the global the glue script calls for marker events.
const MARKER_EVENT_HOOK: &str = "__snowMarkerEvent";

/// A pointer event on a resort marker, as reported by the glue script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerEvent {
    Hover(String),
    Leave(String),
    Click(String),
}

impl MarkerEvent {
    pub fn from_js(kind: &str, id: String) -> Option<Self> {
        match kind {
            "hover" => Some(MarkerEvent::Hover(id)),
            "leave" => Some(MarkerEvent::Leave(id)),
            "click" => Some(MarkerEvent::Click(id)),
            _ => None,
        }
    }
}

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('Snow map JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Quote a string as a JS string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Wait for Mapbox GL and the container element, evaluate the glue script at
/// global scope and create the map. Later calls are no-ops.
pub fn init_map(container_id: &str, view: &MapView, token: &str) {
    let view_json = match serde_json::to_string(view) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize map view: {}", e);
            return;
        }
    };

    let store_js = format!("window.__snowMapScripts = {};", js_string(RESORT_MAP_JS));
    let _ = js_sys::eval(&store_js);

    let container = js_string(container_id);
    let view_arg = js_string(&view_json);
    let token_arg = js_string(token);
    call_js(&format!(
        r#"
        (function() {{
            if (window.__snowMapStarted) return;
            window.__snowMapStarted = true;
            var waitForMapbox = setInterval(function() {{
                if (typeof mapboxgl !== 'undefined' && document.getElementById({container})) {{
                    clearInterval(waitForMapbox);
                    (0, eval)(window.__snowMapScripts);
                    delete window.__snowMapScripts;
                    if (typeof initResortMap !== 'undefined') window.initResortMap = initResortMap;
                    if (typeof renderResortMarkers !== 'undefined') window.renderResortMarkers = renderResortMarkers;
                    if (typeof syncResortPopups !== 'undefined') window.syncResortPopups = syncResortPopups;
                    try {{
                        window.initResortMap({container}, {view_arg}, {token_arg});
                        window.__snowMapReady = true;
                        console.log('Snow map initialized');
                    }} catch(e) {{ console.error('[snow] initResortMap error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Replace every marker on the map, then open the popups in `visible_ids`.
///
/// Polls until the map exists, so it is safe to call before `init_map` has
/// finished. Popups are synced in the same callback because rebuilding the
/// markers closes every popup.
pub fn render_markers(markers: &MarkerSet, visible_ids: &[String]) {
    if let Some(code) = render_markers_js(markers, visible_ids) {
        call_js(&code);
    }
}

fn render_markers_js(markers: &MarkerSet, visible_ids: &[String]) -> Option<String> {
    let markers_json = match serde_json::to_string(&markers.markers) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize markers: {}", e);
            return None;
        }
    };
    let ids_json = serde_json::to_string(visible_ids).unwrap_or_else(|_| "[]".to_string());
    let markers_arg = js_string(&markers_json);
    let ids_arg = js_string(&ids_json);
    Some(format!(
        r#"
        (function() {{
            window.__snowVisiblePopups = {ids_arg};
            var poll = setInterval(function() {{
                if (window.__snowMapReady && typeof window.renderResortMarkers !== 'undefined') {{
                    clearInterval(poll);
                    try {{
                        window.renderResortMarkers({markers_arg}, window.__snowVisiblePopups);
                    }} catch(e) {{ console.error('[snow] renderResortMarkers error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ))
}

/// Show exactly the popups for `visible_ids`; hide the rest.
///
/// The ids are also remembered so a marker redraw still queued behind the
/// poll reopens the latest set.
pub fn sync_popups(visible_ids: &[String]) {
    let ids_json = serde_json::to_string(visible_ids).unwrap_or_else(|_| "[]".to_string());
    call_js(&format!(
        "window.__snowVisiblePopups = {ids}; if (window.__snowMapReady) window.syncResortPopups({ids});",
        ids = js_string(&ids_json)
    ));
}

/// Install the marker event hook. The closure lives for the page lifetime.
pub fn install_marker_events<F>(mut handler: F)
where
    F: FnMut(MarkerEvent) + 'static,
{
    let Some(window) = web_sys::window() else {
        log::error!("No window; marker events disabled");
        return;
    };
    let closure = Closure::<dyn FnMut(String, String)>::new(move |kind: String, id: String| {
        match MarkerEvent::from_js(&kind, id) {
            Some(event) => handler(event),
            None => log::warn!("Unknown marker event kind: {}", kind),
        }
    });
    let target: &JsValue = window.as_ref();
    if let Err(e) = js_sys::Reflect::set(
        target,
        &JsValue::from_str(MARKER_EVENT_HOOK),
        closure.as_ref(),
    ) {
        web_sys::console::warn_1(&e);
    }
    closure.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_event_from_js() {
        assert_eq!(
            MarkerEvent::from_js("hover", "Vail".into()),
            Some(MarkerEvent::Hover("Vail".into()))
        );
        assert_eq!(
            MarkerEvent::from_js("click", "Vail".into()),
            Some(MarkerEvent::Click("Vail".into()))
        );
        assert_eq!(MarkerEvent::from_js("dblclick", "Vail".into()), None);
    }

    #[test]
    fn test_marker_redraw_carries_visible_popups() {
        use snow_core::config::MapConfig;
        use snow_core::{parse_records, ParseOptions};
        use snow_data::map::{build_markers, MapFilter};

        let csv = "Resort,Latitude,Longitude,Status\nVail,39.6,-106.4,Open\n";
        let records = parse_records(csv, &ParseOptions::new(["Resort"])).unwrap().records;
        let markers = build_markers(&records, MapFilter::All, &MapConfig::default());
        let code = render_markers_js(&markers, &["Vail".to_string()]).unwrap();
        let ids = js_string(r#"["Vail"]"#);
        assert!(code.contains(&format!("window.__snowVisiblePopups = {};", ids)));
        assert!(code.contains("window.renderResortMarkers("));
        assert!(code.find("__snowVisiblePopups =") < code.find("setInterval"));
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("it's \"x\"\n"), r#""it's \"x\"\n""#);
    }
}
