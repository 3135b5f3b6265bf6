//! Resort conditions map: markers, popups and hover/pin interaction.
//!
//! Everything here is renderer-agnostic. The browser app serializes a
//! [`MarkerSet`] to JSON for the Mapbox bridge; the CLI writes it as GeoJSON.

use crate::encoding::{color_for_percentage, is_open, marker_size, stroke_for_status};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;
use serde::{Deserialize, Serialize};
use snow_core::config::MapConfig;
use snow_core::Record;
use std::collections::HashMap;

/// Which resorts the map shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFilter {
    #[default]
    All,
    OpenOnly,
}

impl MapFilter {
    pub fn admits(self, status: &str) -> bool {
        match self {
            MapFilter::All => true,
            MapFilter::OpenOnly => is_open(status),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapFilter::All => "All Resorts",
            MapFilter::OpenOnly => "Open Only",
        }
    }
}

/// One labeled line in a popup section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupRow {
    pub label: String,
    pub value: String,
}

impl PopupRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Detail card shown for a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub status: String,
    /// Lowercased status, used as a CSS modifier.
    pub status_class: String,
    pub snow: Vec<PopupRow>,
    pub terrain: Vec<PopupRow>,
    pub updated: Option<String>,
    pub source: String,
}

impl Popup {
    pub fn from_record(record: &Record, config: &MapConfig) -> Self {
        let c = &config.columns;
        let status = record.get_or(&c.status, "Unknown").to_string();

        let mut snow = vec![
            PopupRow::new("24h Snowfall", format!("{}\"", record.get_or(&c.snow_24h, "0"))),
            PopupRow::new("48h Snowfall", format!("{}\"", record.get_or(&c.snow_48h, "0"))),
            PopupRow::new("Base Depth", format!("{}\"", record.get_or(&c.base_depth, "0"))),
        ];
        let mid_depth = record.get_or(&c.mid_depth, "0");
        if mid_depth != "0" {
            snow.push(PopupRow::new("Mid-Mtn Depth", format!("{}\"", mid_depth)));
        }
        let surface = record.get_or(&c.surface, "N/A");
        if surface != "N/A" {
            snow.push(PopupRow::new("Surface", surface));
        }

        let terrain = vec![
            PopupRow::new(
                "Trails",
                format!(
                    "{}/{} ({}%)",
                    record.get_or(&c.open_trails, "0"),
                    record.get_or(&c.total_trails, "0"),
                    record.get_or(&c.trails_pct, "0"),
                ),
            ),
            PopupRow::new(
                "Lifts",
                format!(
                    "{}/{} ({}%)",
                    record.get_or(&c.open_lifts, "0"),
                    record.get_or(&c.total_lifts, "0"),
                    record.get_or(&c.lifts_pct, "0"),
                ),
            ),
        ];

        let updated = record
            .get(&c.last_updated)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Self {
            title: record.name().to_string(),
            status_class: status.to_lowercase(),
            status,
            snow,
            terrain,
            updated,
            source: record.get_or(&c.source, "").to_string(),
        }
    }

    /// Popup markup for the map widget. All values are escaped.
    pub fn to_html(&self) -> String {
        let rows = |rows: &[PopupRow]| -> String {
            rows.iter()
                .map(|r| {
                    format!(
                        "<div class=\"popup-data\"><span class=\"popup-data-label\">{}:</span><span class=\"popup-data-value\">{}</span></div>",
                        encode_text(&r.label),
                        encode_text(&r.value)
                    )
                })
                .collect()
        };
        let updated = self
            .updated
            .as_ref()
            .map(|u| format!("Updated: {}<br>", encode_text(u)))
            .unwrap_or_default();
        format!(
            "<div class=\"popup-header\">{}</div>\
             <div class=\"popup-status {}\">{}</div>\
             <div class=\"popup-section\"><div class=\"popup-label\">Snow Conditions</div>{}</div>\
             <div class=\"popup-section\"><div class=\"popup-label\">Terrain</div>{}</div>\
             <div class=\"popup-footer\">{}Source: {}</div>",
            encode_text(&self.title),
            encode_double_quoted_attribute(&self.status_class),
            encode_text(&self.status),
            rows(&self.snow),
            rows(&self.terrain),
            updated,
            encode_text(&self.source),
        )
    }
}

/// A resort drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Stable across refreshes: the resort identity.
    pub id: String,
    pub name: String,
    /// `[longitude, latitude]`
    pub lng_lat: [f64; 2],
    /// Diameter in pixels.
    pub size: f64,
    pub fill: String,
    pub stroke: String,
    pub opacity: f64,
    pub open: bool,
    pub popup: Popup,
    pub popup_html: String,
}

/// Result of one render pass over the map records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerSet {
    pub markers: Vec<Marker>,
    /// Names of resorts dropped for unusable coordinates.
    pub skipped: Vec<String>,
}

impl MarkerSet {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.iter().any(|m| m.id == id)
    }

    /// GeoJSON FeatureCollection of Point features, one per marker.
    pub fn to_geojson(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = self
            .markers
            .iter()
            .map(|m| {
                serde_json::json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": m.lng_lat},
                    "properties": {
                        "id": m.id,
                        "name": m.name,
                        "size": m.size,
                        "fill": m.fill,
                        "stroke": m.stroke,
                        "opacity": m.opacity,
                        "open": m.open,
                        "status": m.popup.status,
                    },
                })
            })
            .collect();
        serde_json::json!({"type": "FeatureCollection", "features": features})
    }
}

/// Project records onto markers. Records with non-numeric coordinates are
/// skipped with a warning; they never abort the pass.
pub fn build_markers(records: &[Record], filter: MapFilter, config: &MapConfig) -> MarkerSet {
    let c = &config.columns;
    let palette = config.percent_palette();
    let sizing = &config.sizing;
    let mut set = MarkerSet::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let status = record.get_or(&c.status, "");
        if !filter.admits(status) {
            continue;
        }
        let (lat, lng) = match (record.finite(&c.latitude), record.finite(&c.longitude)) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                warn!("Invalid coordinates for {}", record.name());
                set.skipped.push(record.name().to_string());
                continue;
            }
        };

        let size = marker_size(
            record.amount(&c.total_trails),
            sizing.domain_min,
            sizing.domain_max,
            sizing.size_min,
            sizing.size_max,
        );
        let fill = color_for_percentage(record.amount(&c.trails_pct), status, &palette);
        let popup = Popup::from_record(record, config);

        // Marker ids key popups and the JS marker table, so repeats get a suffix.
        let count = seen.entry(record.name()).or_insert(0);
        *count += 1;
        let id = if *count == 1 {
            record.name().to_string()
        } else {
            warn!("Duplicate resort name {}; using id suffix #{}", record.name(), count);
            format!("{} #{}", record.name(), count)
        };

        set.markers.push(Marker {
            id,
            name: record.name().to_string(),
            lng_lat: [lng, lat],
            size,
            fill: fill.to_string(),
            stroke: stroke_for_status(status, &config.stroke).to_string(),
            opacity: config.marker_opacity,
            open: is_open(status),
            popup_html: popup.to_html(),
            popup,
        });
    }

    set
}

/// Hover preview and click-to-pin state for marker popups.
///
/// Hovering shows a marker's popup, leaving hides it again unless the marker
/// is pinned. Clicking toggles the pin and unpins whatever was pinned before,
/// so at most one popup stays open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupState {
    hovered: Option<String>,
    pinned: Option<String>,
}

impl PopupState {
    pub fn hover(&mut self, id: &str) {
        self.hovered = Some(id.to_string());
    }

    pub fn leave(&mut self, id: &str) {
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
    }

    pub fn click(&mut self, id: &str) {
        if self.pinned.as_deref() == Some(id) {
            self.pinned = None;
        } else {
            self.pinned = Some(id.to_string());
        }
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.pinned.as_deref() == Some(id) || self.hovered.as_deref() == Some(id)
    }

    /// Ids whose popups should be open, pinned first.
    pub fn visible_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.pinned.iter().cloned().collect();
        if let Some(h) = &self.hovered {
            if self.pinned.as_ref() != Some(h) {
                ids.push(h.clone());
            }
        }
        ids
    }

    /// Drop references to markers that no longer exist after a re-render.
    pub fn retain(&mut self, markers: &MarkerSet) {
        if let Some(p) = &self.pinned {
            if !markers.contains(p) {
                self.pinned = None;
            }
        }
        if let Some(h) = &self.hovered {
            if !markers.contains(h) {
                self.hovered = None;
            }
        }
    }
}
