use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options controlling how a published spreadsheet export is split into records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Field delimiter, `,` for CSV exports.
    pub delimiter: u8,
    /// Header names that identify a row, in order of preference
    /// (e.g. `["Resort Name", "Resort"]`). Rows with no non-blank
    /// identity are dropped.
    pub identity_fields: Vec<String>,
}

impl ParseOptions {
    pub fn new<S: Into<String>>(identity_fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            delimiter: b',',
            identity_fields: identity_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// One spreadsheet row: field name to trimmed raw value.
///
/// Field presence is never guaranteed. Callers go through [`Record::get_or`]
/// or [`Record::amount`] so a missing column always has a defined default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, String>,
    name: String,
}

impl Record {
    /// Build a record directly from (field, value) pairs. The first non-blank
    /// value among `identity_fields` becomes the record name.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>, identity_fields: &[String]) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into().trim().to_string(), v.into().trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        let name = identity_fields
            .iter()
            .filter_map(|f| fields.get(f))
            .find(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_default();
        Self { fields, name }
    }

    /// Resort (or forecast entity) name; empty only for records built by hand.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value of `field`, or `fallback` when the field is absent or blank.
    pub fn get_or<'a>(&'a self, field: &str, fallback: &'a str) -> &'a str {
        match self.get(field) {
            Some(v) if !v.is_empty() => v,
            _ => fallback,
        }
    }

    /// Numeric value of `field`. Missing or unparsable values are 0.
    pub fn amount(&self, field: &str) -> f64 {
        self.get(field).map(parse_amount).unwrap_or(0.0)
    }

    /// Finite numeric value of `field`, or `None` if it doesn't parse.
    pub fn finite(&self, field: &str) -> Option<f64> {
        self.get(field)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse a raw cell into a number; anything non-numeric or non-finite is 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Header names plus parsed rows, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Parse a published CSV export into records keyed by the header row.
///
/// Quoted cells may contain the delimiter. Short rows get empty values for the
/// missing columns, extra cells are ignored, unnamed columns are dropped and
/// rows without an identity are skipped.
pub fn parse_records(text: &str, options: &ParseOptions) -> anyhow::Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = rdr.records();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Dataset::default()),
    };

    let mut records = Vec::new();
    let mut skipped = 0u32;
    for row in rows {
        let row = row?;
        let pairs = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), row.get(i).unwrap_or("")));
        let record = Record::from_pairs(pairs, &options.identity_fields);
        if record.name().is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }
    log::debug!(
        "record: parsed {} rows, skipped {} without identity",
        records.len(),
        skipped
    );

    Ok(Dataset { headers, records })
}
