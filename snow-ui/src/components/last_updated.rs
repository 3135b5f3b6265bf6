use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LastUpdatedProps {
    /// Already formatted timestamp.
    pub value: String,
}

/// "Last updated: ..." footer line.
#[component]
pub fn LastUpdated(props: LastUpdatedProps) -> Element {
    rsx! {
        p {
            id: "last-updated",
            style: "margin: 8px 0; font-size: 12px; color: #666;",
            "Last updated: {props.value}"
        }
    }
}
