//! Resort-name prefix filter for the forecast table.

use crate::state::ForecastAppState;
use dioxus::prelude::*;
use snow_data::state::ForecastEvent;

#[component]
pub fn NameFilterInput() -> Element {
    let app = use_context::<ForecastAppState>();
    let query = app.state.read().query.clone();

    rsx! {
        div {
            style: "margin: 8px 0;",
            input {
                id: "resort-filter",
                r#type: "text",
                placeholder: "Filter resorts...",
                value: "{query}",
                style: "padding: 6px 8px; width: 240px; border: 1px solid #ccc; border-radius: 4px;",
                oninput: move |evt: Event<FormData>| {
                    app.dispatch(ForecastEvent::FilterChanged(evt.value()));
                },
            }
        }
    }
}
