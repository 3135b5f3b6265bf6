//! Fetching the published CSV exports.
//!
//! The HTTP client is only compiled with the `api` feature so the WASM apps
//! don't pull in reqwest; they fetch through the browser instead.

use std::fmt;

/// Errors that can occur while pulling a CSV export.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    Request(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response body could not be read as text.
    Body(String),
    /// The body was empty or contained only whitespace.
    Empty,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "request failed: {}", e),
            FetchError::Status(code) => write!(f, "server returned HTTP {}", code),
            FetchError::Body(e) => write!(f, "failed to read response body: {}", e),
            FetchError::Empty => write!(f, "response body was empty"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Reject bodies that can't contain even a header row.
pub fn check_body(body: String) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        Err(FetchError::Empty)
    } else {
        Ok(body)
    }
}

#[cfg(feature = "api")]
pub use client::CsvClient;

#[cfg(feature = "api")]
mod client {
    use super::{check_body, FetchError};
    use log::info;
    use std::time::Duration;

    /// Thin reqwest wrapper that issues one GET per call.
    #[derive(Clone)]
    pub struct CsvClient {
        http: reqwest::Client,
    }

    impl CsvClient {
        pub fn new() -> anyhow::Result<Self> {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?;
            Ok(Self { http })
        }

        /// GET `url` and return the body text.
        pub async fn fetch_csv(&self, url: &str) -> Result<String, FetchError> {
            info!("Fetching {}", url);
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Request(e.to_string()))?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::Body(e.to_string()))?;
            info!("Received {} bytes", body.len());
            check_body(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_body() {
        assert_eq!(check_body("  \n".to_string()), Err(FetchError::Empty));
        assert_eq!(check_body("Resort\n".to_string()).unwrap(), "Resort\n");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "server returned HTTP 404");
        assert_eq!(
            FetchError::Request("timed out".into()).to_string(),
            "request failed: timed out"
        );
    }

    #[cfg(feature = "api")]
    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let client = CsvClient::new().unwrap();
        let result = client.fetch_csv("http://127.0.0.1:9/data.csv").await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
