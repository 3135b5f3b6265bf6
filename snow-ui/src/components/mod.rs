//! Reusable Dioxus RSX components for the snow report pages.

mod error_display;
mod filter_toggle;
mod forecast_table;
mod last_updated;
mod loading_spinner;
mod map_container;
mod name_filter;
mod page_header;

pub use error_display::ErrorDisplay;
pub use filter_toggle::FilterToggle;
pub use forecast_table::ForecastTableView;
pub use last_updated::LastUpdated;
pub use loading_spinner::LoadingSpinner;
pub use map_container::MapContainer;
pub use name_filter::NameFilterInput;
pub use page_header::PageHeader;
