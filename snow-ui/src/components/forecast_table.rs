//! Sortable snowfall forecast table.
//!
//! Headers dispatch `SortChanged`; the row order comes from the rendered
//! `ForecastTable`, so sorting only touches state.

use crate::state::ForecastAppState;
use dioxus::prelude::*;
use snow_data::forecast::{Cell, ColumnHeader, ForecastTable, SnowCell};
use snow_data::state::ForecastEvent;

#[derive(Props, Clone, PartialEq)]
pub struct ForecastTableProps {
    pub table: ForecastTable,
}

#[component]
pub fn ForecastTableView(props: ForecastTableProps) -> Element {
    let table = props.table;

    if table.rows.is_empty() {
        return rsx! {
            p {
                style: "padding: 16px; color: #666;",
                "No resorts match the filter ({table.total_rows} total)."
            }
        };
    }

    rsx! {
        table {
            id: "forecast-table",
            style: "border-collapse: collapse; width: 100%; font-size: 14px;",
            thead {
                tr {
                    for (i, column) in table.columns.iter().cloned().enumerate() {
                        HeaderCell { key: "{i}", column }
                    }
                }
            }
            tbody {
                for (n, row) in table.rows.iter().enumerate() {
                    tr {
                        key: "{n}-{row.name}",
                        style: "border-bottom: 1px solid #eee;",
                        for (i, cell) in row.cells.iter().enumerate() {
                            td {
                                key: "{i}",
                                style: if i == 0 { "padding: 6px 8px; text-align: left;" } else { "padding: 6px 8px; text-align: center;" },
                                {render_cell(cell)}
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct HeaderCellProps {
    column: ColumnHeader,
}

#[component]
fn HeaderCell(props: HeaderCellProps) -> Element {
    let app = use_context::<ForecastAppState>();
    let column = props.column;
    let key = column.key.clone();
    let arrow = column.sorted.map(|d| d.arrow()).unwrap_or("");

    rsx! {
        th {
            class: if column.sorted.is_some() { "sortable sorted" } else { "sortable" },
            style: "padding: 8px; cursor: pointer; user-select: none; border-bottom: 2px solid #333; white-space: nowrap;",
            onclick: move |_| {
                app.dispatch(ForecastEvent::SortChanged(key.clone()));
            },
            div { "{column.title} {arrow}" }
            if let Some(sub) = column.subtitle.as_ref() {
                div {
                    style: "font-size: 11px; font-weight: normal; color: #666;",
                    "{sub}"
                }
            }
        }
    }
}

fn render_cell(cell: &Cell) -> Element {
    match cell {
        Cell::Text { text } => rsx! { strong { "{text}" } },
        Cell::Count { text } => rsx! { span { "{text}" } },
        Cell::Snow(snow) => snow_bar(snow),
    }
}

fn snow_bar(snow: &SnowCell) -> Element {
    let bar = format!(
        "position: absolute; bottom: 0; left: 0; width: 100%; height: {}%; background: {};",
        snow.height,
        snow.bucket.color()
    );
    rsx! {
        div {
            class: "snow-cell {snow.bucket.class()}",
            style: "position: relative; height: 32px; min-width: 36px; background: #FAFAFA;",
            div { class: "snow-bar", style: "{bar}" }
            span {
                style: "position: relative; z-index: 1; line-height: 32px; font-weight: 600;",
                "{snow.label}"
            }
        }
    }
}
