//! Colorado Ski Resort Conditions Map
//!
//! Plots every resort in the published conditions sheet on a Mapbox map.
//! Marker size follows total trail count and fill follows the share of
//! trails open. Hovering a marker previews its popup and clicking pins it.
//!
//! Data flow:
//! 1. On mount the Mapbox glue script is loaded and marker events are wired
//!    back into `MapAppState::dispatch`.
//! 2. A refresh loop fetches the CSV, dispatches `DataArrived`, then sleeps
//!    for the configured interval before the next fetch.
//! 3. Redraw counters in the state drive the marker and popup effects.

use dioxus::prelude::*;
use snow_core::config::MapConfig;
use snow_data::state::MapEvent;
use snow_ui::components::{FilterToggle, LastUpdated, MapContainer, PageHeader};
use snow_ui::fetch::{fetch_csv, sleep_ms};
use snow_ui::js_bridge::{self, MarkerEvent};
use snow_ui::state::MapAppState;
use snow_utils::dates::format_updated;

/// DOM id for the Mapbox container div.
const MAP_CONTAINER_ID: &str = "map";

const MAPBOX_JS: &str = "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.js";
const MAPBOX_CSS: &str = "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.css";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("snow-map-root"))
        .launch(App);
}

/// Default map configuration with an optional build-time data URL override.
fn map_config() -> MapConfig {
    let mut config = MapConfig::default();
    if let Some(url) = option_env!("SNOW_MAP_DATA_URL") {
        config.data_url = url.to_string();
    }
    config
}

#[component]
fn App() -> Element {
    let app = use_context_provider(|| MapAppState::with_config(map_config()));

    // Create the map and route marker events into the state
    use_effect(move || {
        let config = app.config.peek().clone();
        js_bridge::init_map(MAP_CONTAINER_ID, &config.view, option_env!("MAPBOX_TOKEN").unwrap_or(""));
        js_bridge::install_marker_events(move |event| {
            let event = match event {
                MarkerEvent::Hover(id) => MapEvent::MarkerHovered(id),
                MarkerEvent::Leave(id) => MapEvent::MarkerLeft(id),
                MarkerEvent::Click(id) => MapEvent::MarkerClicked(id),
            };
            app.dispatch(event);
        });
    });

    // Refresh loop: one fetch at a time, then wait out the interval
    use_effect(move || {
        spawn(async move {
            let (url, interval) = {
                let config = app.config.peek();
                (config.data_url.clone(), config.refresh_interval())
            };
            let interval_ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
            loop {
                app.dispatch(MapEvent::Fetch);
                let result = fetch_csv(&url).await;
                app.dispatch(MapEvent::DataArrived(result));
                sleep_ms(interval_ms).await;
            }
        });
    });

    // Rebuild markers when the data or filter changed; kept popups reopen with them
    use_effect(move || {
        let _version = (app.marker_version)();
        let (markers, visible) = {
            let config = app.config.peek();
            let state = app.state.peek();
            (state.render(&config), state.popups.visible_ids())
        };
        log::info!("Rendering {} markers ({} skipped)", markers.len(), markers.skipped.len());
        js_bridge::render_markers(&markers, &visible);
    });

    // Show or hide popups after hover and click
    use_effect(move || {
        let _version = (app.popup_version)();
        js_bridge::sync_popups(&app.state.peek().popups.visible_ids());
    });

    let (error, loading, updated) = {
        let state = app.state.read();
        (
            state.status.error().unwrap_or_default().to_string(),
            state.status.is_loading(),
            state.last_updated.as_deref().map(format_updated),
        )
    };

    rsx! {
        document::Stylesheet { href: MAPBOX_CSS }
        document::Script { src: MAPBOX_JS }
        div {
            style: "max-width: 1400px; margin: 0 auto; padding: 16px; font-family: sans-serif;",
            PageHeader {
                title: "Colorado Ski Resort Conditions",
                subtitle: "Marker size shows total trails; color shows the share of trails open.",
            }
            FilterToggle {}
            MapContainer {
                id: MAP_CONTAINER_ID,
                loading,
                error,
            }
            if let Some(updated) = updated {
                LastUpdated { value: updated }
            }
        }
    }
}
