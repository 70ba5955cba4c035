//! Run configuration.
//!
//! Settings come from three layers, later layers winning:
//! built-in defaults, an optional YAML file (`--config`), then CLI flags.
//! Every YAML field is optional.
//!
//! ```yaml
//! listing_url: https://www.thehindu.com/opinion/editorial/
//! num_articles: 2
//! request_delay_ms: 500
//! analysis:
//!   model: gemini-2.5-flash
//!   temperature: 0.2
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::prompt::SYSTEM_PROMPT;
use crate::scrapers::session::{DEFAULT_REQUEST_DELAY, ScrapePolicy};
use crate::scrapers::thehindu::LISTING_URL;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

/// Settings for the generative-model call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the Gemini API.
    pub endpoint: String,
    pub model: String,
    /// Kept low so the analysis is close to deterministic.
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    /// Replaces the built-in mentor prompt when set.
    pub system_prompt: Option<String>,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            timeout_secs: 120,
            system_prompt: None,
            api_key: None,
        }
    }
}

impl AnalysisConfig {
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listing_url: String,
    pub num_articles: usize,
    pub request_delay_ms: u64,
    pub fetch_timeout_secs: u64,
    pub output_dir: String,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            num_articles: 1,
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            fetch_timeout_secs: 30,
            output_dir: "output".to_string(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the YAML file at `path`, or fall back to defaults when no path
    /// is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay whatever the user passed on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.listing_url {
            self.listing_url = url.clone();
        }
        if let Some(n) = cli.num_articles {
            self.num_articles = n;
        }
        if let Some(ms) = cli.request_delay_ms {
            self.request_delay_ms = ms;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(model) = &cli.model {
            self.analysis.model = model.clone();
        }
        self.analysis.api_key = cli.gemini_api_key.clone();
    }

    pub fn scrape_policy(&self) -> ScrapePolicy {
        ScrapePolicy {
            request_delay: Duration::from_millis(self.request_delay_ms),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.listing_url, LISTING_URL);
        assert_eq!(config.num_articles, 1);
        assert_eq!(config.scrape_policy().request_delay, Duration::from_millis(500));
        assert_eq!(config.analysis.system_prompt(), SYSTEM_PROMPT);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            "num_articles: 3\nanalysis:\n  temperature: 0.0\n  system_prompt: Be brief.\n",
        )
        .unwrap();
        assert_eq!(config.num_articles, 3);
        assert_eq!(config.request_delay_ms, 500);
        assert_eq!(config.analysis.temperature, 0.0);
        assert_eq!(config.analysis.model, "gemini-2.5-flash");
        assert_eq!(config.analysis.system_prompt(), "Be brief.");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.output_dir, "output");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_dir: /tmp/reports\nfetch_timeout_secs: 5").unwrap();

        let config = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.output_dir, "/tmp/reports");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Some("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = AppConfig::from_yaml("num_articles: 3\nrequest_delay_ms: 900").unwrap();
        let cli = Cli::parse_from([
            "editorial_mentor",
            "-n",
            "5",
            "--request-delay-ms",
            "0",
            "--gemini-api-key",
            "secret",
        ]);
        config.apply_cli(&cli);
        assert_eq!(config.num_articles, 5);
        assert_eq!(config.request_delay_ms, 0);
        assert_eq!(config.analysis.api_key.as_deref(), Some("secret"));
    }
}
