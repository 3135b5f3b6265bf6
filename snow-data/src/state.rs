//! Pipeline state and the transitions that drive it.
//!
//! Each page owns one state value. Timer ticks, fetch results and user input
//! arrive as named events and are applied in order; rendering is a pure
//! function of the state.

use crate::forecast::{build_table, discover_date_columns, ColumnKey, DayColumn, ForecastTable, SortState};
use crate::map::{build_markers, MapFilter, MarkerSet, PopupState};
use log::{error, info};
use snow_core::config::{ForecastConfig, MapConfig};
use snow_core::{parse_records, Record};

/// Shown in place of the loading indicator when a refresh fails.
pub const MAP_ERROR_MESSAGE: &str = "Error loading resort data. Please try again later.";
pub const FORECAST_ERROR_MESSAGE: &str = "Error loading forecast data. Please try again later.";

/// Where a pipeline is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing has arrived yet.
    #[default]
    Loading,
    /// A fetch is in flight; the last good data is still shown.
    Refreshing,
    Ready,
    /// The last fetch failed. Previous records, if any, are kept.
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Fetch,
    /// Raw CSV body, or the reason the fetch failed.
    DataArrived(Result<String, String>),
    FilterChanged(MapFilter),
    MarkerHovered(String),
    MarkerLeft(String),
    MarkerClicked(String),
}

/// What the view has to redo after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    /// Popup visibility changed; markers are unchanged.
    Popups,
    /// The marker set must be rebuilt.
    Markers,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub records: Vec<Record>,
    pub filter: MapFilter,
    pub popups: PopupState,
    pub status: LoadStatus,
    /// "Last Updated" of the first record.
    pub last_updated: Option<String>,
}

impl MapState {
    pub fn apply(&mut self, event: MapEvent, config: &MapConfig) -> Redraw {
        match event {
            MapEvent::Fetch => {
                if !self.status.is_loading() {
                    self.status = LoadStatus::Refreshing;
                }
                Redraw::Nothing
            }
            MapEvent::DataArrived(Ok(body)) => match parse_records(&body, &config.parse_options()) {
                Ok(dataset) => {
                    info!("Loaded {} resorts", dataset.records.len());
                    self.last_updated = dataset
                        .records
                        .first()
                        .map(|r| r.get_or(&config.columns.last_updated, "Unknown").to_string());
                    self.records = dataset.records;
                    self.status = LoadStatus::Ready;
                    let markers = self.render(config);
                    self.popups.retain(&markers);
                    Redraw::Markers
                }
                Err(e) => self.fail(format!("CSV parse failed: {}", e)),
            },
            MapEvent::DataArrived(Err(e)) => self.fail(e),
            MapEvent::FilterChanged(filter) => {
                if self.filter == filter {
                    return Redraw::Nothing;
                }
                self.filter = filter;
                let markers = self.render(config);
                self.popups.retain(&markers);
                Redraw::Markers
            }
            MapEvent::MarkerHovered(id) => {
                self.popups.hover(&id);
                Redraw::Popups
            }
            MapEvent::MarkerLeft(id) => {
                self.popups.leave(&id);
                Redraw::Popups
            }
            MapEvent::MarkerClicked(id) => {
                self.popups.click(&id);
                Redraw::Popups
            }
        }
    }

    fn fail(&mut self, reason: String) -> Redraw {
        error!("Error loading resort data: {}", reason);
        self.status = LoadStatus::Failed(MAP_ERROR_MESSAGE.to_string());
        Redraw::Nothing
    }

    pub fn render(&self, config: &MapConfig) -> MarkerSet {
        build_markers(&self.records, self.filter, config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastEvent {
    Fetch,
    DataArrived(Result<String, String>),
    SortChanged(ColumnKey),
    FilterChanged(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastState {
    pub records: Vec<Record>,
    pub sort: SortState,
    /// Resort-name prefix filter.
    pub query: String,
    pub status: LoadStatus,
}

impl ForecastState {
    pub fn apply(&mut self, event: ForecastEvent, config: &ForecastConfig) {
        match event {
            ForecastEvent::Fetch => {
                if !self.status.is_loading() {
                    self.status = LoadStatus::Refreshing;
                }
            }
            ForecastEvent::DataArrived(Ok(body)) => match parse_records(&body, &config.parse_options()) {
                Ok(dataset) if dataset.records.is_empty() => {
                    self.fail("no forecast rows in CSV".to_string());
                }
                Ok(dataset) => {
                    info!("Loaded {} forecast rows", dataset.records.len());
                    self.records = dataset.records;
                    self.status = LoadStatus::Ready;
                    self.sort = self.sort.resolve(&self.day_columns(config));
                }
                Err(e) => self.fail(format!("CSV parse failed: {}", e)),
            },
            ForecastEvent::DataArrived(Err(e)) => self.fail(e),
            ForecastEvent::SortChanged(column) => {
                // Click against the sort the table is showing.
                self.sort = self.sort.resolve(&self.day_columns(config));
                self.sort.click(column);
            }
            ForecastEvent::FilterChanged(query) => self.query = query,
        }
    }

    fn day_columns(&self, config: &ForecastConfig) -> Vec<DayColumn> {
        self.records
            .first()
            .map(|r| discover_date_columns(r, config.max_day_columns))
            .unwrap_or_default()
    }

    fn fail(&mut self, reason: String) {
        error!("Failed to load CSV: {}", reason);
        self.status = LoadStatus::Failed(FORECAST_ERROR_MESSAGE.to_string());
    }

    /// True once a load has produced rows. The rendered table always has
    /// its fixed columns, so this is what gates showing it.
    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn render(&self, config: &ForecastConfig) -> ForecastTable {
        build_table(&self.records, config, &self.sort, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::SortDirection;

    const MAP_CSV: &str = "\
Resort Name,Latitude,Longitude,Status,Total Trails,Trails Open %,Last Updated
Vail,39.6,-106.4,Open,195,62,2025-01-05 15:07
Echo Mountain,39.68,-105.52,Closed,7,0,2025-01-05 15:07
Nowhere,N/A,-105.0,Open,10,10,2025-01-05 15:07
";

    const FORECAST_CSV: &str = "\
Resort,1/6/2025,1/7/2025,Forecasted snowfall days,Last_Updated
Vail,1,2,2,2025-01-05 15:07
Wolf Creek,6,5,2,2025-01-05 15:07
";

    #[test]
    fn test_map_data_arrival() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        assert!(state.status.is_loading());
        assert_eq!(state.apply(MapEvent::Fetch, &config), Redraw::Nothing);
        assert!(state.status.is_loading());

        let redraw = state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        assert_eq!(redraw, Redraw::Markers);
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.last_updated.as_deref(), Some("2025-01-05 15:07"));

        let markers = state.render(&config);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers.skipped, vec!["Nowhere".to_string()]);
    }

    #[test]
    fn test_map_failure_keeps_last_good_data() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        state.apply(MapEvent::Fetch, &config);
        assert_eq!(state.status, LoadStatus::Refreshing);

        state.apply(MapEvent::DataArrived(Err("timeout".to_string())), &config);
        assert_eq!(state.status.error(), Some(MAP_ERROR_MESSAGE));
        assert_eq!(state.render(&config).len(), 2);
    }

    #[test]
    fn test_map_filter_persists_across_refresh() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        assert_eq!(
            state.apply(MapEvent::FilterChanged(MapFilter::OpenOnly), &config),
            Redraw::Markers
        );
        assert_eq!(
            state.apply(MapEvent::FilterChanged(MapFilter::OpenOnly), &config),
            Redraw::Nothing
        );
        assert_eq!(state.render(&config).len(), 1);

        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        assert_eq!(state.filter, MapFilter::OpenOnly);
        assert_eq!(state.render(&config).len(), 1);
    }

    #[test]
    fn test_pin_survives_refresh_but_not_filter_removal() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        state.apply(MapEvent::MarkerClicked("Echo Mountain".into()), &config);
        assert_eq!(
            state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config),
            Redraw::Markers
        );
        assert_eq!(state.popups.pinned(), Some("Echo Mountain"));
        assert_eq!(state.popups.visible_ids(), vec!["Echo Mountain".to_string()]);

        state.apply(MapEvent::FilterChanged(MapFilter::OpenOnly), &config);
        assert_eq!(state.popups.pinned(), None);
    }

    #[test]
    fn test_marker_redraw_keeps_pinned_popup_visible() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        state.apply(MapEvent::MarkerClicked("Vail".into()), &config);

        assert_eq!(
            state.apply(MapEvent::FilterChanged(MapFilter::OpenOnly), &config),
            Redraw::Markers
        );
        assert!(state.render(&config).contains("Vail"));
        assert_eq!(state.popups.visible_ids(), vec!["Vail".to_string()]);

        state.apply(MapEvent::Fetch, &config);
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        assert_eq!(state.popups.visible_ids(), vec!["Vail".to_string()]);
    }

    #[test]
    fn test_marker_interaction_events() {
        let config = MapConfig::default();
        let mut state = MapState::default();
        state.apply(MapEvent::DataArrived(Ok(MAP_CSV.to_string())), &config);
        assert_eq!(state.apply(MapEvent::MarkerHovered("Vail".into()), &config), Redraw::Popups);
        state.apply(MapEvent::MarkerClicked("Vail".into()), &config);
        state.apply(MapEvent::MarkerLeft("Vail".into()), &config);
        assert_eq!(state.popups.visible_ids(), vec!["Vail".to_string()]);
    }

    #[test]
    fn test_forecast_transitions() {
        let config = ForecastConfig::default();
        let mut state = ForecastState::default();
        state.apply(ForecastEvent::DataArrived(Ok(FORECAST_CSV.to_string())), &config);
        assert_eq!(state.status, LoadStatus::Ready);

        let names = |table: ForecastTable| -> Vec<String> { table.rows.into_iter().map(|r| r.name).collect() };
        assert_eq!(names(state.render(&config)), vec!["Wolf Creek", "Vail"]);

        state.apply(ForecastEvent::SortChanged(ColumnKey::Total), &config);
        assert_eq!(state.sort.direction, SortDirection::Asc);
        assert_eq!(names(state.render(&config)), vec!["Vail", "Wolf Creek"]);

        state.apply(ForecastEvent::FilterChanged("wolf".into()), &config);
        assert_eq!(names(state.render(&config)), vec!["Wolf Creek"]);

        state.apply(ForecastEvent::Fetch, &config);
        state.apply(ForecastEvent::DataArrived(Ok(FORECAST_CSV.to_string())), &config);
        assert_eq!(state.query, "wolf");
        assert_eq!(state.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_on_rolled_off_day_follows_displayed_header() {
        let config = ForecastConfig::default();
        let mut state = ForecastState::default();
        let before = "Resort,1/5/2025,1/6/2025\nVail,1,2\nWolf Creek,6,5\n";
        let after = "Resort,1/6/2025,1/7/2025\nVail,1,2\nWolf Creek,6,5\n";
        state.apply(ForecastEvent::DataArrived(Ok(before.to_string())), &config);
        state.apply(ForecastEvent::SortChanged(ColumnKey::Day("1/5/2025".into())), &config);
        assert_eq!(state.sort.column, ColumnKey::Day("1/5/2025".into()));

        state.apply(ForecastEvent::DataArrived(Ok(after.to_string())), &config);
        assert_eq!(state.sort, SortState::default());
        let shown = state.render(&config);
        let total = shown.columns.iter().find(|c| c.key == ColumnKey::Total).unwrap();
        assert_eq!(total.sorted, Some(SortDirection::Desc));

        state.apply(ForecastEvent::SortChanged(ColumnKey::Total), &config);
        let shown = state.render(&config);
        let total = shown.columns.iter().find(|c| c.key == ColumnKey::Total).unwrap();
        assert_eq!(total.sorted, Some(SortDirection::Asc));
    }

    #[test]
    fn test_forecast_has_data_only_after_rows_load() {
        let config = ForecastConfig::default();
        let mut state = ForecastState::default();
        assert!(!state.render(&config).columns.is_empty());
        assert!(!state.has_data());

        state.apply(ForecastEvent::Fetch, &config);
        state.apply(ForecastEvent::DataArrived(Err("offline".into())), &config);
        assert!(!state.has_data());

        state.apply(ForecastEvent::DataArrived(Ok(FORECAST_CSV.to_string())), &config);
        assert!(state.has_data());
        state.apply(ForecastEvent::DataArrived(Err("offline".into())), &config);
        assert!(state.has_data());
    }

    #[test]
    fn test_forecast_empty_csv_is_an_error() {
        let config = ForecastConfig::default();
        let mut state = ForecastState::default();
        state.apply(ForecastEvent::DataArrived(Ok("Resort,1/6/2025\n,3\n".to_string())), &config);
        assert_eq!(state.status.error(), Some(FORECAST_ERROR_MESSAGE));
        assert!(state.records.is_empty());
    }
}
