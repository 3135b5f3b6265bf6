//! Configuration schema for both pipelines.
//!
//! The map and forecast pages were tuned through several palette, marker-size
//! and basemap variants. They are all expressed here as one schema with
//! enumerated presets, loadable from JSON with every field defaulted.

use crate::record::ParseOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Published CSV export of the resort conditions sheet.
pub const DEFAULT_MAP_DATA_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRre-sQPQqn1VAhLoDgTOwOOTUdKnT688YjHZXQpxN0ArMwt4j9zPQYirvzQX1TxiSUJOXk8ma_AyYl/pub?output=csv";

/// Published CSV export of the snowfall forecast sheet.
pub const DEFAULT_FORECAST_DATA_URL: &str = "https://docs.google.com/spreadsheets/d/1tT9bwV1jCgTx8utL0vvSqZUWqQi1JiWEXaWvhd9G__Y/gviz/tq?tqx=out:csv&gid=0";

/// Basemap used when no custom style is configured.
pub const DEFAULT_MAP_STYLE: &str = "mapbox://styles/mapbox/outdoors-v12";

/// Five minutes, the refresh cadence of both pages.
pub const DEFAULT_REFRESH_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    PaletteSize { thresholds: usize, colors: usize },
    ThresholdOrder,
    SizeRange,
    EmptyIdentity,
    ZeroRefresh,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PaletteSize { thresholds, colors } => write!(
                f,
                "palette needs {} colors for {} thresholds, got {}",
                thresholds + 1,
                thresholds,
                colors
            ),
            ConfigError::ThresholdOrder => write!(f, "palette thresholds must be strictly ascending"),
            ConfigError::SizeRange => write!(f, "marker size and trail domain ranges must not be inverted"),
            ConfigError::EmptyIdentity => write!(f, "at least one identity field is required"),
            ConfigError::ZeroRefresh => write!(f, "refresh interval must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Named palettes the map has shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalettePreset {
    /// Light blue to dark green.
    Greens,
    /// Blue, green, yellow, red.
    Vivid,
}

/// Percentage-open color scale: `colors[i]` applies below `thresholds[i]`,
/// the last color applies to everything at or above the last threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentPalette {
    pub closed: String,
    pub thresholds: Vec<f64>,
    pub colors: Vec<String>,
}

impl PercentPalette {
    pub fn preset(preset: PalettePreset) -> Self {
        let (closed, colors): (&str, [&str; 4]) = match preset {
            PalettePreset::Greens => ("#BDBDBD", ["#90CAF9", "#66BB6A", "#43A047", "#2E7D32"]),
            PalettePreset::Vivid => ("#E8EAED", ["#4285F4", "#34A853", "#FBBC04", "#EA4335"]),
        };
        Self {
            closed: closed.to_string(),
            thresholds: vec![5.0, 25.0, 50.0],
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.len() != self.thresholds.len() + 1 {
            return Err(ConfigError::PaletteSize {
                thresholds: self.thresholds.len(),
                colors: self.colors.len(),
            });
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ThresholdOrder);
        }
        Ok(())
    }
}

impl Default for PercentPalette {
    fn default() -> Self {
        Self::preset(PalettePreset::Greens)
    }
}

/// Marker outline colors keyed by open/closed status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeColors {
    pub open: String,
    pub closed: String,
}

impl Default for StrokeColors {
    fn default() -> Self {
        Self {
            open: "#F5F5F5".to_string(),
            closed: "#424242".to_string(),
        }
    }
}

/// Marker radius range and the trail-count domain it interpolates over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSizing {
    pub size_min: f64,
    pub size_max: f64,
    /// Smallest resort (Echo Mountain, 7 trails).
    pub domain_min: f64,
    /// Largest resort (Vail, 277 trails).
    pub domain_max: f64,
}

impl Default for MarkerSizing {
    fn default() -> Self {
        Self {
            size_min: 12.0,
            size_max: 36.0,
            domain_min: 7.0,
            domain_max: 277.0,
        }
    }
}

/// Column names of the resort conditions sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapColumns {
    pub latitude: String,
    pub longitude: String,
    pub status: String,
    pub open_trails: String,
    pub total_trails: String,
    pub trails_pct: String,
    pub open_lifts: String,
    pub total_lifts: String,
    pub lifts_pct: String,
    pub snow_24h: String,
    pub snow_48h: String,
    pub base_depth: String,
    pub mid_depth: String,
    pub surface: String,
    pub source: String,
    pub last_updated: String,
}

impl Default for MapColumns {
    fn default() -> Self {
        Self {
            latitude: "Latitude".into(),
            longitude: "Longitude".into(),
            status: "Status".into(),
            open_trails: "Open Trails".into(),
            total_trails: "Total Trails".into(),
            trails_pct: "Trails Open %".into(),
            open_lifts: "Open Lifts".into(),
            total_lifts: "Total Lifts".into(),
            lifts_pct: "Lifts Open %".into(),
            snow_24h: "24h Snowfall (in)".into(),
            snow_48h: "48h Snowfall (in)".into(),
            base_depth: "Base Depth (in)".into(),
            mid_depth: "Mid-Mtn Depth (in)".into(),
            surface: "Surface Conditions".into(),
            source: "Data Source".into(),
            last_updated: "Last Updated".into(),
        }
    }
}

/// Initial camera for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    pub style: String,
    /// `[[west, south], [east, north]]`, Colorado by default.
    pub bounds: [[f64; 2]; 2],
    pub padding: u32,
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            style: DEFAULT_MAP_STYLE.to_string(),
            bounds: [[-109.06, 36.99], [-102.04, 41.00]],
            padding: 50,
            center: [-106.5, 39.0],
            zoom: 6.5,
            min_zoom: 5.0,
            max_zoom: 12.0,
        }
    }
}

/// Settings for the resort conditions map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub data_url: String,
    pub identity_fields: Vec<String>,
    pub columns: MapColumns,
    pub view: MapView,
    /// Explicit palette; when absent the preset is used.
    pub palette: Option<PercentPalette>,
    pub palette_preset: PalettePreset,
    pub stroke: StrokeColors,
    pub sizing: MarkerSizing,
    pub marker_opacity: f64,
    pub refresh_secs: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_MAP_DATA_URL.to_string(),
            identity_fields: vec!["Resort Name".to_string(), "Resort".to_string()],
            columns: MapColumns::default(),
            view: MapView::default(),
            palette: None,
            palette_preset: PalettePreset::Greens,
            stroke: StrokeColors::default(),
            sizing: MarkerSizing::default(),
            marker_opacity: 0.85,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl MapConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.identity_fields.iter().cloned())
    }

    /// The palette in effect: the explicit one, else the preset.
    pub fn percent_palette(&self) -> PercentPalette {
        self.palette
            .clone()
            .unwrap_or_else(|| PercentPalette::preset(self.palette_preset))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity_fields.is_empty() {
            return Err(ConfigError::EmptyIdentity);
        }
        if self.refresh_secs == 0 {
            return Err(ConfigError::ZeroRefresh);
        }
        let s = &self.sizing;
        if s.size_min > s.size_max || s.domain_min > s.domain_max {
            return Err(ConfigError::SizeRange);
        }
        self.percent_palette().validate()
    }
}

/// Settings for the snowfall forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub data_url: String,
    pub identity_fields: Vec<String>,
    /// How many of the most recent date columns to show.
    pub max_day_columns: usize,
    /// Amount that fills a day bar completely.
    pub day_scale_max: f64,
    /// Amount that fills the total bar completely.
    pub total_scale_max: f64,
    pub snow_days_field: String,
    pub last_updated_field: String,
    pub refresh_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_FORECAST_DATA_URL.to_string(),
            identity_fields: vec!["Resort".to_string()],
            max_day_columns: 5,
            day_scale_max: 10.0,
            total_scale_max: 20.0,
            snow_days_field: "Forecasted snowfall days".to_string(),
            last_updated_field: "Last_Updated".to_string(),
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl ForecastConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.identity_fields.iter().cloned())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity_fields.is_empty() {
            return Err(ConfigError::EmptyIdentity);
        }
        if self.refresh_secs == 0 {
            return Err(ConfigError::ZeroRefresh);
        }
        Ok(())
    }
}

/// Both pipelines' settings, as stored in a single JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub forecast: ForecastConfig,
}

impl Config {
    /// Parse a JSON config; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.map.validate()?;
        config.forecast.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.map.validate().is_ok());
        assert!(config.forecast.validate().is_ok());
        assert_eq!(config.map.refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{"map": {"palette_preset": "vivid", "sizing": {"size_max": 50}}, "forecast": {"max_day_columns": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.map.palette_preset, PalettePreset::Vivid);
        assert_eq!(config.map.percent_palette().colors[0], "#4285F4");
        assert_eq!(config.map.sizing.size_max, 50.0);
        assert_eq!(config.map.sizing.size_min, 12.0);
        assert_eq!(config.map.columns.latitude, "Latitude");
        assert_eq!(config.forecast.max_day_columns, 3);
        assert_eq!(config.forecast.identity_fields, vec!["Resort".to_string()]);
    }

    #[test]
    fn test_explicit_palette_overrides_preset() {
        let config = Config::from_json(
            r##"{"map": {"palette": {"closed": "#000", "thresholds": [50], "colors": ["#111", "#222"]}}}"##,
        )
        .unwrap();
        assert_eq!(config.map.percent_palette().colors, vec!["#111", "#222"]);
    }

    #[test]
    fn test_invalid_palette_rejected() {
        let palette = PercentPalette {
            closed: "#000".into(),
            thresholds: vec![5.0, 25.0],
            colors: vec!["#111".into()],
        };
        assert_eq!(
            palette.validate(),
            Err(ConfigError::PaletteSize { thresholds: 2, colors: 1 })
        );

        let unordered = PercentPalette {
            closed: "#000".into(),
            thresholds: vec![25.0, 5.0],
            colors: vec!["#1".into(), "#2".into(), "#3".into()],
        };
        assert_eq!(unordered.validate(), Err(ConfigError::ThresholdOrder));
    }

    #[test]
    fn test_invalid_map_config_rejected() {
        let mut config = MapConfig::default();
        config.sizing.size_min = 40.0;
        assert_eq!(config.validate(), Err(ConfigError::SizeRange));

        let mut config = MapConfig::default();
        config.refresh_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRefresh));

        assert!(Config::from_json(r#"{"forecast": {"identity_fields": []}}"#).is_err());
    }
}
