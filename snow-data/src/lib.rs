//! Visual encodings and render models for the snow report.
//!
//! This crate turns parsed records into what the pages draw:
//! - `encoding`: pure value → color / size / bar-height functions
//! - `map`: resort markers, popups and popup hover/pin state
//! - `forecast`: forecast table columns, cells and sorting
//! - `state`: per-page state and the events that update it

pub mod encoding;
pub mod forecast;
pub mod map;
pub mod state;
