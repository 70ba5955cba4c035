//! Command-line interface definitions for Editorial Mentor.
//!
//! Every option is optional: anything not given falls back to the YAML config
//! file (when `--config` is passed) and then to built-in defaults.

use clap::{Parser, ValueEnum};

/// Report formats that can be produced for a run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable report on stdout
    Console,
    /// JSON file with the session envelope and analyses
    Json,
    /// Markdown report file
    Markdown,
}

/// Command-line arguments for the Editorial Mentor application.
///
/// # Examples
///
/// ```sh
/// # Analyse today's lead editorial
/// editorial_mentor
///
/// # Two editorials, JSON and Markdown only, custom directory
/// editorial_mentor -n 2 -f json -f markdown -o ./reports
///
/// # Scrape without calling the model
/// editorial_mentor --scrape-only -f json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of editorials to scrape
    #[arg(short, long)]
    pub num_articles: Option<usize>,

    /// Editorial listing page to scrape
    #[arg(long)]
    pub listing_url: Option<String>,

    /// Directory the report files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Base file name for reports (defaults to a timestamped name)
    #[arg(long)]
    pub output_name: Option<String>,

    /// Report formats to produce (repeatable)
    #[arg(short, long = "format", value_enum, default_values_t = [ReportFormat::Console, ReportFormat::Json, ReportFormat::Markdown])]
    pub formats: Vec<ReportFormat>,

    /// Only scrape; skip the model analysis
    #[arg(long)]
    pub scrape_only: bool,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,

    /// Pause between article fetches, in milliseconds
    #[arg(long)]
    pub request_delay_ms: Option<u64>,
}
