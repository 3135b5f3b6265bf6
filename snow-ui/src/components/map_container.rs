//! Map container component with loading and error overlays.

use dioxus::prelude::*;

/// Props for MapContainer
#[derive(Props, Clone, PartialEq)]
pub struct MapContainerProps {
    /// The DOM id Mapbox renders into
    pub id: String,
    #[props(default = false)]
    pub loading: bool,
    /// Replaces the loading overlay when non-empty
    #[props(default = String::new())]
    pub error: String,
    #[props(default = 600)]
    pub min_height: u32,
}

/// A full-width container div for the Mapbox map.
#[component]
pub fn MapContainer(props: MapContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; height: {}px; position: relative; width: 100%;",
        props.min_height, props.min_height
    );
    let overlay = "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); z-index: 2;";

    rsx! {
        div {
            style: "{style}",
            if !props.error.is_empty() {
                div {
                    class: "error",
                    style: "{overlay} color: #C62828; background: #FFEBEE; padding: 12px 16px; border-radius: 4px;",
                    "{props.error}"
                }
            } else if props.loading {
                div {
                    class: "loading",
                    style: "{overlay} color: #666;",
                    "Loading resort data..."
                }
            }
            div {
                id: "{props.id}",
                style: "width: 100%; height: 100%; position: absolute; top: 0; left: 0;",
            }
        }
    }
}
