//! `map` subcommand: resort markers as JSON or GeoJSON.

use crate::{write_output, MapFormat};
use log::{info, warn};
use snow_core::config::MapConfig;
use snow_core::fetch::CsvClient;
use snow_data::map::MapFilter;
use snow_data::state::{MapEvent, MapState};
use std::path::Path;

pub async fn run_map(
    config: &MapConfig,
    open_only: bool,
    format: MapFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let client = CsvClient::new()?;
    let body = client.fetch_csv(&config.data_url).await?;
    let filter = if open_only { MapFilter::OpenOnly } else { MapFilter::All };
    let rendered = render_map(body, config, filter, format)?;
    write_output(&rendered, output)
}

/// Run a fetched CSV body through the map pipeline and serialize the markers.
pub fn render_map(body: String, config: &MapConfig, filter: MapFilter, format: MapFormat) -> anyhow::Result<String> {
    let mut state = MapState::default();
    state.apply(MapEvent::FilterChanged(filter), config);
    state.apply(MapEvent::DataArrived(Ok(body)), config);
    if let Some(msg) = state.status.error() {
        anyhow::bail!("{}", msg);
    }

    let markers = state.render(config);
    if !markers.skipped.is_empty() {
        warn!("Skipped {} resorts with invalid coordinates", markers.skipped.len());
    }
    info!(
        "Rendered {} of {} resorts ({})",
        markers.len(),
        state.records.len(),
        filter.label()
    );

    let json = match format {
        MapFormat::Json => serde_json::to_string_pretty(&markers)?,
        MapFormat::Geojson => serde_json::to_string_pretty(&markers.to_geojson())?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Resort Name,Latitude,Longitude,Status,Open Trails,Total Trails,Trails Open %
Vail,39.6,-106.4,Open,120,195,62
Echo Mountain,39.68,-105.52,Closed,0,7,0
Broken,abc,-105.0,Open,1,10,10
";

    #[test]
    fn test_render_map_json() {
        let config = MapConfig::default();
        let out = render_map(CSV.to_string(), &config, MapFilter::All, MapFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let markers = value["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0]["id"], "Vail");
        assert_eq!(value["skipped"][0], "Broken");
    }

    #[test]
    fn test_render_map_open_only_geojson() {
        let config = MapConfig::default();
        let out = render_map(CSV.to_string(), &config, MapFilter::OpenOnly, MapFormat::Geojson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["coordinates"][0], -106.4);
    }
}
