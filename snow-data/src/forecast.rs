//! Snowfall forecast table: date-column discovery, sorting and cell encodings.

use crate::encoding::{bucket_for_amount, format_amount, round_to_half_unit, scaled_height, to_amount, SnowBucket};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snow_core::config::ForecastConfig;
use snow_core::Record;
use snow_utils::dates::{format_updated, header_label, is_mdy, parse_mdy, MISSING_TIMESTAMP};
use std::cmp::Ordering;

/// A column the table can be sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum ColumnKey {
    /// Resort name.
    Name,
    /// One forecast day, keyed by its "M/D/YYYY" header.
    Day(String),
    /// Sum of the displayed forecast days.
    Total,
    /// Precomputed count of days with snow in the forecast.
    SnowDays,
}

impl ColumnKey {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnKey::Name => ColumnKind::Text,
            _ => ColumnKind::Numeric,
        }
    }

    /// Parse a CLI-style column name: `name`, `total`, `snow-days`, or a date label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "resort" => Some(ColumnKey::Name),
            "total" => Some(ColumnKey::Total),
            "snow-days" | "snow_days" | "days" => Some(ColumnKey::SnowDays),
            other if is_mdy(other) => Some(ColumnKey::Day(other.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "\u{25B2}",
            SortDirection::Desc => "\u{25BC}",
        }
    }
}

/// Active sort column and direction. Defaults to the total, descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: ColumnKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: ColumnKey::Total,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(column: ColumnKey, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: a new column starts descending, the same column flips.
    pub fn click(&mut self, column: ColumnKey) {
        if self.column == column {
            self.direction = self.direction.reversed();
        } else {
            self.column = column;
            self.direction = SortDirection::Desc;
        }
    }

    /// Fall back to the default when sorting by a day that has rolled off.
    pub(crate) fn resolve(&self, days: &[DayColumn]) -> SortState {
        match &self.column {
            ColumnKey::Day(key) if !days.iter().any(|d| &d.key == key) => SortState::default(),
            _ => self.clone(),
        }
    }
}

/// A forecast day column found in the sheet header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    /// Header exactly as it appears in the sheet.
    pub key: String,
    pub date: NaiveDate,
    /// "Mon"
    pub weekday: String,
    /// "1/6"
    pub month_day: String,
}

/// Find the "M/D/YYYY" fields of `record`, keep the `limit` most recent,
/// and return them in chronological order.
pub fn discover_date_columns(record: &Record, limit: usize) -> Vec<DayColumn> {
    let mut days: Vec<DayColumn> = record
        .field_names()
        .filter_map(|name| {
            parse_mdy(name).ok().map(|date| {
                let (weekday, month_day) = header_label(&date);
                DayColumn {
                    key: name.to_string(),
                    date,
                    weekday,
                    month_day,
                }
            })
        })
        .collect();
    days.sort_by_key(|d| d.date);
    let excess = days.len().saturating_sub(limit);
    days.drain(..excess);
    days
}

/// Sum of the record's amounts over `days`, each rounded to half units.
pub fn day_total(record: &Record, days: &[DayColumn]) -> f64 {
    days.iter()
        .map(|d| round_to_half_unit(record.amount(&d.key)))
        .sum()
}

/// Case-insensitive prefix match on the resort name. An empty query matches all.
pub fn matches_prefix(name: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || name.to_lowercase().starts_with(&query.to_lowercase())
}

fn numeric_value(record: &Record, column: &ColumnKey, days: &[DayColumn], config: &ForecastConfig) -> f64 {
    match column {
        ColumnKey::Name => 0.0,
        ColumnKey::Day(key) => to_amount(record.get(key).unwrap_or("")),
        ColumnKey::Total => day_total(record, days),
        ColumnKey::SnowDays => record.amount(&config.snow_days_field),
    }
}

/// Re-order `records` for `sort`. Text columns compare lexicographically,
/// numeric ones by value with unparsable cells as 0.
pub fn sort_records(records: &mut [&Record], sort: &SortState, days: &[DayColumn], config: &ForecastConfig) {
    records.sort_by(|a, b| {
        let ordering = match sort.column.kind() {
            ColumnKind::Text => a.name().cmp(b.name()),
            ColumnKind::Numeric => {
                let x = numeric_value(a, &sort.column, days, config);
                let y = numeric_value(b, &sort.column, days, config);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    pub key: ColumnKey,
    pub title: String,
    /// Second header line, e.g. the "1/6" under "Mon".
    pub subtitle: Option<String>,
    pub kind: ColumnKind,
    /// Set on the column the table is currently sorted by.
    pub sorted: Option<SortDirection>,
}

/// A snowfall amount with its bar encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowCell {
    pub value: f64,
    pub label: String,
    pub bucket: SnowBucket,
    /// Bar fill in percent.
    pub height: f64,
}

impl SnowCell {
    pub fn new(value: f64, scale_max: f64) -> Self {
        let value = round_to_half_unit(value);
        Self {
            value,
            label: format_amount(value),
            bucket: bucket_for_amount(value),
            height: scaled_height(value, scale_max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },
    Snow(SnowCell),
    Count { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Everything the table view needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<ForecastRow>,
    pub last_updated: String,
    /// Rows before the text filter was applied.
    pub total_rows: usize,
}

impl ForecastTable {
    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let headers: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut title = match &c.subtitle {
                    Some(sub) => format!("{} {}", c.title, sub),
                    None => c.title.clone(),
                };
                if let Some(dir) = c.sorted {
                    title.push(' ');
                    title.push_str(dir.arrow());
                }
                title
            })
            .collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                r.cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Text { text } | Cell::Count { text } => text.clone(),
                        Cell::Snow(s) => s.label.clone(),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|i| {
                body.iter()
                    .filter_map(|row| row.get(i))
                    .map(|s| s.chars().count())
                    .chain(std::iter::once(headers[i].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, w))| {
                    if i == 0 {
                        format!("{:<w$}", cell, w = *w)
                    } else {
                        format!("{:>w$}", cell, w = *w)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&headers));
        out.push('\n');
        for row in &body {
            out.push_str(&line(row));
            out.push('\n');
        }
        out.push_str(&format!("Last updated: {}\n", self.last_updated));
        out
    }
}

/// Build the table for `records`: discover day columns from the first record,
/// apply the name filter, then sort.
pub fn build_table(records: &[Record], config: &ForecastConfig, sort: &SortState, query: &str) -> ForecastTable {
    let days = records
        .first()
        .map(|r| discover_date_columns(r, config.max_day_columns))
        .unwrap_or_default();
    let sort = sort.resolve(&days);

    let mut visible: Vec<&Record> = records
        .iter()
        .filter(|r| matches_prefix(r.name(), query))
        .collect();
    sort_records(&mut visible, &sort, &days, config);

    let sorted_flag = |key: &ColumnKey| (sort.column == *key).then_some(sort.direction);
    let mut columns = vec![ColumnHeader {
        key: ColumnKey::Name,
        title: "Resort".to_string(),
        subtitle: None,
        kind: ColumnKind::Text,
        sorted: sorted_flag(&ColumnKey::Name),
    }];
    for day in &days {
        let key = ColumnKey::Day(day.key.clone());
        columns.push(ColumnHeader {
            sorted: sorted_flag(&key),
            key,
            title: day.weekday.clone(),
            subtitle: Some(day.month_day.clone()),
            kind: ColumnKind::Numeric,
        });
    }
    columns.push(ColumnHeader {
        key: ColumnKey::Total,
        title: format!("{}-day total", days.len()),
        subtitle: None,
        kind: ColumnKind::Numeric,
        sorted: sorted_flag(&ColumnKey::Total),
    });
    columns.push(ColumnHeader {
        key: ColumnKey::SnowDays,
        title: "Snow".to_string(),
        subtitle: Some("days".to_string()),
        kind: ColumnKind::Numeric,
        sorted: sorted_flag(&ColumnKey::SnowDays),
    });

    let rows = visible
        .iter()
        .map(|record| {
            let mut cells = vec![Cell::Text {
                text: record.name().to_string(),
            }];
            cells.extend(
                days.iter()
                    .map(|d| Cell::Snow(SnowCell::new(record.amount(&d.key), config.day_scale_max))),
            );
            cells.push(Cell::Snow(SnowCell::new(day_total(record, &days), config.total_scale_max)));
            cells.push(Cell::Count {
                text: record.get_or(&config.snow_days_field, "0").to_string(),
            });
            ForecastRow {
                name: record.name().to_string(),
                cells,
            }
        })
        .collect();

    let last_updated = records
        .first()
        .map(|r| format_updated(r.get_or(&config.last_updated_field, "")))
        .unwrap_or_else(|| MISSING_TIMESTAMP.to_string());

    ForecastTable {
        columns,
        rows,
        last_updated,
        total_rows: records.len(),
    }
}
