//! Error types for the scraping, analysis and configuration boundaries.
//!
//! None of these are fatal to a run: the orchestrator and the analysis
//! invoker turn them into per-article placeholders or missing analyses.

use thiserror::Error;

/// Failures while talking to the news source.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid URL {0}")]
    InvalidUrl(String),
}

/// Failures at the generative-model boundary.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("model request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model response had no text candidates")]
    EmptyResponse,
}

/// Failures while loading the YAML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let e = ScrapeError::Status {
            url: "https://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(e.to_string(), "https://example.com/a returned HTTP 503");
    }

    #[test]
    fn test_api_error_message() {
        let e = AnalysisError::Api {
            status: 429,
            body: "quota".to_string(),
        };
        assert!(e.to_string().contains("429"));
        assert!(e.to_string().contains("quota"));
    }
}
