//! All / open-only toggle for the resort map.

use crate::state::MapAppState;
use dioxus::prelude::*;
use snow_data::map::MapFilter;
use snow_data::state::MapEvent;

/// Two buttons; the active one is highlighted.
#[component]
pub fn FilterToggle() -> Element {
    let app = use_context::<MapAppState>();
    let current = app.state.read().filter;

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 8px; align-items: center;",
            for filter in [MapFilter::All, MapFilter::OpenOnly] {
                button {
                    key: "{filter.label()}",
                    class: if filter == current { "filter-btn active" } else { "filter-btn" },
                    style: if filter == current {
                        "padding: 6px 12px; border: 1px solid #2E7D32; border-radius: 4px; background: #2E7D32; color: white; cursor: pointer;"
                    } else {
                        "padding: 6px 12px; border: 1px solid #ccc; border-radius: 4px; background: white; color: #333; cursor: pointer;"
                    },
                    onclick: move |_| {
                        app.dispatch(MapEvent::FilterChanged(filter));
                    },
                    "{filter.label()}"
                }
            }
        }
    }
}
