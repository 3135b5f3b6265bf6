//! Shared Dioxus components and Mapbox bridge for the snow report pages.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the Mapbox glue script via `js_sys::eval()`
//! - `fetch`: browser `fetch` and `setTimeout` as futures
//! - `state`: per-page state in Dioxus Signals
//! - `components`: reusable RSX components (filters, table, containers, etc.)

pub mod components;
pub mod fetch;
pub mod js_bridge;
pub mod state;
