//! Colorado Ski Resort Snowfall Forecast
//!
//! A sortable table of the next few days of forecast snowfall per resort.
//! Each day cell carries a bar scaled to the amount and a color bucket;
//! the derived total column sums the shown days.
//!
//! Data flow:
//! 1. A refresh loop fetches the forecast CSV and dispatches `DataArrived`.
//! 2. Header clicks and the name filter dispatch `SortChanged` / `FilterChanged`.
//! 3. The table is re-rendered from `ForecastState::render` on every change.

use dioxus::prelude::*;
use snow_core::config::ForecastConfig;
use snow_data::state::ForecastEvent;
use snow_ui::components::{ErrorDisplay, ForecastTableView, LastUpdated, LoadingSpinner, NameFilterInput, PageHeader};
use snow_ui::fetch::{fetch_csv, sleep_ms};
use snow_ui::state::ForecastAppState;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("snow-forecast-root"))
        .launch(App);
}

fn forecast_config() -> ForecastConfig {
    let mut config = ForecastConfig::default();
    if let Some(url) = option_env!("SNOW_FORECAST_DATA_URL") {
        config.data_url = url.to_string();
    }
    config
}

#[component]
fn App() -> Element {
    let app = use_context_provider(|| ForecastAppState::with_config(forecast_config()));

    use_effect(move || {
        spawn(async move {
            let (url, interval) = {
                let config = app.config.peek();
                (config.data_url.clone(), config.refresh_interval())
            };
            let interval_ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
            loop {
                app.dispatch(ForecastEvent::Fetch);
                let result = fetch_csv(&url).await;
                app.dispatch(ForecastEvent::DataArrived(result));
                sleep_ms(interval_ms).await;
            }
        });
    });

    let state = app.state.read();
    let table = state.render(&app.config.read());
    let error = state.status.error().map(str::to_string);
    let has_data = state.has_data();
    let loading = state.status.is_loading() && !has_data;
    drop(state);

    rsx! {
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 16px; font-family: sans-serif;",
            PageHeader {
                title: "Colorado Snowfall Forecast",
                subtitle: "Forecast snowfall in inches. Click a column header to sort.",
            }
            NameFilterInput {}
            if let Some(message) = error {
                ErrorDisplay { message }
            } else if loading {
                LoadingSpinner { label: "Loading forecast..." }
            }
            if has_data {
                ForecastTableView { table: table.clone() }
                LastUpdated { value: table.last_updated.clone() }
            }
        }
    }
}
