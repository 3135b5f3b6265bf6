//! `watch` subcommand: the refresh loop without a browser.
//!
//! Each tick fetches, applies `DataArrived` and logs a summary. A failed
//! fetch is logged and the loop waits for the next tick.

use crate::Pipeline;
use log::{info, warn};
use snow_core::config::Config;
use snow_core::fetch::CsvClient;
use snow_data::state::{ForecastEvent, ForecastState, LoadStatus, MapEvent, MapState};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

pub async fn run_watch(
    mut config: Config,
    pipeline: Pipeline,
    url: Option<String>,
    interval_secs: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(url) = url {
        match pipeline {
            Pipeline::Map => config.map.data_url = url,
            Pipeline::Forecast => config.forecast.data_url = url,
        }
    }
    let period = match (interval_secs, pipeline) {
        (Some(0), _) => anyhow::bail!("--interval-secs must be greater than zero"),
        (Some(secs), _) => Duration::from_secs(secs),
        (None, Pipeline::Map) => config.map.refresh_interval(),
        (None, Pipeline::Forecast) => config.forecast.refresh_interval(),
    };

    let client = CsvClient::new()?;
    let mut ticker = interval(period);
    // A slow fetch delays the next tick instead of bursting to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Watching {:?} every {}s", pipeline, period.as_secs());

    let mut map_state = MapState::default();
    let mut forecast_state = ForecastState::default();
    loop {
        ticker.tick().await;
        match pipeline {
            Pipeline::Map => {
                map_state.apply(MapEvent::Fetch, &config.map);
                let result = client.fetch_csv(&config.map.data_url).await.map_err(|e| e.to_string());
                map_state.apply(MapEvent::DataArrived(result), &config.map);
                log_map_summary(&map_state, &config);
            }
            Pipeline::Forecast => {
                forecast_state.apply(ForecastEvent::Fetch, &config.forecast);
                let result = client
                    .fetch_csv(&config.forecast.data_url)
                    .await
                    .map_err(|e| e.to_string());
                forecast_state.apply(ForecastEvent::DataArrived(result), &config.forecast);
                log_forecast_summary(&forecast_state, &config);
            }
        }
    }
}

fn log_map_summary(state: &MapState, config: &Config) {
    if let LoadStatus::Failed(msg) = &state.status {
        warn!("{} (keeping {} resorts)", msg, state.records.len());
        return;
    }
    let markers = state.render(&config.map);
    let open = markers.markers.iter().filter(|m| m.open).count();
    info!(
        "{} resorts, {} open, {} skipped; updated {}",
        markers.len(),
        open,
        markers.skipped.len(),
        state.last_updated.as_deref().unwrap_or("Unknown")
    );
}

fn log_forecast_summary(state: &ForecastState, config: &Config) {
    if let LoadStatus::Failed(msg) = &state.status {
        warn!("{} (keeping {} rows)", msg, state.records.len());
        return;
    }
    let table = state.render(&config.forecast);
    let leader = table.rows.first().map(|r| r.name.as_str()).unwrap_or("-");
    info!(
        "{} forecast rows; most snow: {}; updated {}",
        table.rows.len(),
        leader,
        table.last_updated
    );
}
