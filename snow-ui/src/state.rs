//! Application state managed via Dioxus context.
//!
//! Each page provides its state with `use_context_provider` and child
//! components retrieve it with `use_context`. All mutation goes through
//! `dispatch`, which forwards the event to the pipeline's `apply`.

use dioxus::prelude::*;
use snow_core::config::{ForecastConfig, MapConfig};
use snow_data::state::{ForecastEvent, ForecastState, MapEvent, MapState, Redraw};

/// Shared state for the resort conditions map.
#[derive(Clone, Copy)]
pub struct MapAppState {
    pub state: Signal<MapState>,
    pub config: Signal<MapConfig>,
    /// Bumped whenever the marker set must be redrawn.
    pub marker_version: Signal<u64>,
    /// Bumped whenever popup visibility changed.
    pub popup_version: Signal<u64>,
}

impl MapAppState {
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self {
            state: Signal::new(MapState::default()),
            config: Signal::new(config),
            marker_version: Signal::new(0),
            popup_version: Signal::new(0),
        }
    }

    /// Apply one event and bump the redraw counters it calls for.
    pub fn dispatch(mut self, event: MapEvent) -> Redraw {
        let redraw = {
            let config = self.config.peek();
            self.state.write().apply(event, &config)
        };
        match redraw {
            Redraw::Markers => *self.marker_version.write() += 1,
            Redraw::Popups => *self.popup_version.write() += 1,
            Redraw::Nothing => {}
        }
        redraw
    }
}

impl Default for MapAppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for the snowfall forecast table.
#[derive(Clone, Copy)]
pub struct ForecastAppState {
    pub state: Signal<ForecastState>,
    pub config: Signal<ForecastConfig>,
}

impl ForecastAppState {
    pub fn new() -> Self {
        Self::with_config(ForecastConfig::default())
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self {
            state: Signal::new(ForecastState::default()),
            config: Signal::new(config),
        }
    }

    pub fn dispatch(mut self, event: ForecastEvent) {
        let config = self.config.peek();
        self.state.write().apply(event, &config);
    }
}

impl Default for ForecastAppState {
    fn default() -> Self {
        Self::new()
    }
}
