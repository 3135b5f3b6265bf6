//! `forecast` subcommand: the sorted snowfall table as text or JSON.

use crate::{write_output, ForecastFormat};
use log::info;
use snow_core::config::ForecastConfig;
use snow_core::fetch::CsvClient;
use snow_data::forecast::{ColumnKey, SortDirection, SortState};
use snow_data::state::{ForecastEvent, ForecastState};
use std::path::Path;

/// Build the sort state from `--sort` and `--ascending`.
pub fn sort_from_args(column: &str, ascending: bool) -> anyhow::Result<SortState> {
    let column = ColumnKey::parse(column).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown sort column '{}': expected name, total, snow-days or a M/D/YYYY date",
            column
        )
    })?;
    let direction = if ascending { SortDirection::Asc } else { SortDirection::Desc };
    Ok(SortState::new(column, direction))
}

pub async fn run_forecast(
    config: &ForecastConfig,
    sort: SortState,
    filter: &str,
    format: ForecastFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let client = CsvClient::new()?;
    let body = client.fetch_csv(&config.data_url).await?;
    let rendered = render_forecast(body, config, sort, filter, format)?;
    write_output(&rendered, output)
}

pub fn render_forecast(
    body: String,
    config: &ForecastConfig,
    sort: SortState,
    filter: &str,
    format: ForecastFormat,
) -> anyhow::Result<String> {
    let mut state = ForecastState {
        sort,
        query: filter.to_string(),
        ..ForecastState::default()
    };
    state.apply(ForecastEvent::DataArrived(Ok(body)), config);
    if let Some(msg) = state.status.error() {
        anyhow::bail!("{}", msg);
    }

    let table = state.render(config);
    info!("Rendered {} of {} forecast rows", table.rows.len(), table.total_rows);
    match format {
        ForecastFormat::Text => Ok(table.to_text()),
        ForecastFormat::Json => Ok(serde_json::to_string_pretty(&table)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Resort,1/6/2025,1/7/2025,Forecasted snowfall days,Last_Updated
Vail,1,2,2,2025-01-05 15:07
Wolf Creek,6,5,2,2025-01-05 15:07
Aspen,0,0.5,1,2025-01-05 15:07
";

    fn names(text: &str) -> Vec<String> {
        text.lines()
            .skip(1)
            .filter(|l| !l.starts_with("Last updated"))
            .filter_map(|l| l.split("  ").next())
            .map(|s| s.trim().to_string())
            .collect()
    }

    #[test]
    fn test_sort_from_args() {
        assert_eq!(sort_from_args("total", false).unwrap(), SortState::default());
        assert_eq!(
            sort_from_args("name", true).unwrap(),
            SortState::new(ColumnKey::Name, SortDirection::Asc)
        );
        assert_eq!(
            sort_from_args("1/7/2025", false).unwrap().column,
            ColumnKey::Day("1/7/2025".to_string())
        );
        assert!(sort_from_args("banana", false).is_err());
    }

    #[test]
    fn test_render_forecast_text_default_sort() {
        let config = ForecastConfig::default();
        let out = render_forecast(CSV.to_string(), &config, SortState::default(), "", ForecastFormat::Text).unwrap();
        assert_eq!(names(&out), vec!["Wolf Creek", "Vail", "Aspen"]);
        assert!(out.ends_with("Last updated: Jan 5, 3:07 PM\n"));
    }

    #[test]
    fn test_render_forecast_filtered_json() {
        let config = ForecastConfig::default();
        let sort = SortState::new(ColumnKey::Name, SortDirection::Asc);
        let out = render_forecast(CSV.to_string(), &config, sort, "v", ForecastFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = value["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Vail");
        assert_eq!(value["total_rows"], 3);
    }

    #[test]
    fn test_render_forecast_empty_is_error() {
        let config = ForecastConfig::default();
        let result = render_forecast("Resort\n".to_string(), &config, SortState::default(), "", ForecastFormat::Text);
        assert!(result.is_err());
    }
}
