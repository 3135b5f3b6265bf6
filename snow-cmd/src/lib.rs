//! Command implementations for the snow report CLI.
//!
//! Each subcommand fetches one published CSV, runs it through the same
//! pipeline state the browser pages use, and writes the rendered result.

use clap::{Subcommand, ValueEnum};
use snow_core::config::Config;
use std::path::{Path, PathBuf};

pub mod forecast;
pub mod map;
pub mod watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MapFormat {
    /// Marker list with popups and encodings
    Json,
    /// GeoJSON FeatureCollection of resort points
    Geojson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForecastFormat {
    /// Aligned plain-text table
    Text,
    /// Columns, rows and cell encodings as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pipeline {
    Map,
    Forecast,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the resort conditions sheet and render map markers
    Map {
        /// CSV URL (defaults to the configured sheet)
        #[arg(short, long)]
        url: Option<String>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only include resorts whose status is Open
        #[arg(long)]
        open_only: bool,

        #[arg(short, long, value_enum, default_value_t = MapFormat::Json)]
        format: MapFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the forecast sheet and render the sorted table
    Forecast {
        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sort column: name, total, snow-days or a M/D/YYYY date
        #[arg(short, long, default_value = "total")]
        sort: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Resort-name prefix filter (case-insensitive)
        #[arg(long)]
        filter: Option<String>,

        #[arg(short, long, value_enum, default_value_t = ForecastFormat::Text)]
        format: ForecastFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Refresh a pipeline on a timer and log a summary of each fetch
    Watch {
        #[arg(value_enum)]
        pipeline: Pipeline,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides the configured refresh interval
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Map {
            url,
            config,
            open_only,
            format,
            output,
        } => {
            let mut config = load_config(config.as_deref())?.map;
            if let Some(url) = url {
                config.data_url = url;
            }
            map::run_map(&config, open_only, format, output.as_deref()).await
        }
        Command::Forecast {
            url,
            config,
            sort,
            ascending,
            filter,
            format,
            output,
        } => {
            let mut config = load_config(config.as_deref())?.forecast;
            if let Some(url) = url {
                config.data_url = url;
            }
            let sort = forecast::sort_from_args(&sort, ascending)?;
            let filter = filter.unwrap_or_default();
            forecast::run_forecast(&config, sort, &filter, format, output.as_deref()).await
        }
        Command::Watch {
            pipeline,
            url,
            config,
            interval_secs,
        } => {
            let config = load_config(config.as_deref())?;
            watch::run_watch(config, pipeline, url, interval_secs).await
        }
    }
}

/// Load the JSON config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            Config::load(path).map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
        }
        None => Ok(Config::default()),
    }
}

/// Write `content` to `output`, or to stdout.
pub fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            log::info!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join("snow-cmd-test-config.json");
        std::fs::write(&path, r#"{"forecast": {"max_day_columns": 3}}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.forecast.max_day_columns, 3);
        assert_eq!(config.map, Config::default().map);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let path = std::env::temp_dir().join("snow-cmd-test-bad-config.json");
        std::fs::write(&path, r#"{"map": {"refresh_secs": 0}}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_output_to_file() {
        let path = std::env::temp_dir().join("snow-cmd-test-output.txt");
        write_output("hello\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        std::fs::remove_file(&path).unwrap();
    }
}
