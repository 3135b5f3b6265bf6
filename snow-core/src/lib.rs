//! Core types for the ski resort snow report.
//!
//! - `record`: CSV export → ordered records keyed by the header row
//! - `config`: the configuration schema shared by the map and forecast pages
//! - `fetch`: fetch errors and, with the `api` feature, the native CSV client

pub mod config;
pub mod fetch;
pub mod record;

pub use record::{parse_records, Dataset, ParseOptions, Record};
