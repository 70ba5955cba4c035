//! # Editorial Mentor
//!
//! A batch pipeline that scrapes newspaper editorials, asks a generative model
//! for a structured CAT-VARC reading analysis of each one, and writes the
//! result as console, JSON and Markdown reports.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... editorial_mentor -n 2 -o ./output
//! ```
//!
//! ## Architecture
//!
//! The run is a single sequential pipeline:
//! 1. **Discovery**: find editorial links on the listing page
//! 2. **Extraction**: fetch each article and isolate title and body text
//! 3. **Analysis**: send each body to the model and validate the answer
//! 4. **Output**: console report, JSON digest, Markdown report
//!
//! Failures degrade single articles (error records, missing analyses); the
//! run itself always completes and always reports a session.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod prompt;
mod schema;
mod scrapers;
mod utils;

use analysis::{Analyzer, without_analysis};
use api::GeminiClient;
use cli::{Cli, ReportFormat};
use config::AppConfig;
use models::{EditorialDigest, ScrapeSession, SessionStatus};
use outputs::{console, json, markdown};
use scrapers::session::scrape;
use scrapers::thehindu::{LISTING_URL, TheHindu};
use scrapers::{HttpFetcher, SiteAdapter};
use utils::{ensure_writable_dir, report_stem};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("editorial_mentor starting up");

    let args = Cli::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_cli(&args);
    debug!(
        listing_url = %config.listing_url,
        num_articles = config.num_articles,
        output_dir = %config.output_dir,
        formats = ?args.formats,
        "Resolved configuration"
    );

    let writes_files = args
        .formats
        .iter()
        .any(|f| matches!(f, ReportFormat::Json | ReportFormat::Markdown));
    if writes_files {
        if let Err(e) = ensure_writable_dir(&config.output_dir).await {
            error!(
                path = %config.output_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Scrape ----
    let adapter = if config.listing_url == LISTING_URL {
        TheHindu::default()
    } else {
        TheHindu::with_listing_url(&config.listing_url)?
    };
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    let session = scrape(
        &adapter,
        &fetcher,
        adapter.listing_url(),
        config.num_articles,
        config.scrape_policy(),
    )
    .await;

    // ---- Analyse ----
    let digest = analyse(&config, &args, session).await;

    // ---- Output ----
    let stem = report_stem(args.output_name.as_deref(), digest.session.scraped_at);
    write_outputs(&digest, &args, &config.output_dir, &stem).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        status = ?digest.session.status,
        articles = digest.session.total_articles,
        analysed = digest.analysed_count(),
        "Execution complete"
    );

    Ok(())
}

/// Run the model over the session unless the run is scrape-only, the scrape
/// failed, or no API key is configured.
async fn analyse(config: &AppConfig, args: &Cli, session: ScrapeSession) -> EditorialDigest {
    if args.scrape_only || session.status == SessionStatus::Error {
        return without_analysis(session);
    }

    let Some(api_key) = config.analysis.api_key.clone() else {
        warn!("No Gemini API key (set GEMINI_API_KEY or --gemini-api-key); skipping analysis");
        return without_analysis(session);
    };

    match GeminiClient::new(config.analysis.clone(), api_key) {
        Ok(client) => Analyzer::new(client).digest(session).await,
        Err(e) => {
            error!(error = %e, "Could not build Gemini client; skipping analysis");
            without_analysis(session)
        }
    }
}

#[instrument(level = "info", skip(digest, args))]
async fn write_outputs(digest: &EditorialDigest, args: &Cli, output_dir: &str, stem: &str) {
    for format in &args.formats {
        match format {
            ReportFormat::Console => console::print_report(digest),
            ReportFormat::Json => {
                let written = if args.scrape_only {
                    json::write_json(&digest.session, output_dir, stem).await
                } else {
                    json::write_json(digest, output_dir, stem).await
                };
                if let Err(e) = written {
                    error!(error = %e, "Failed to write JSON report");
                }
            }
            ReportFormat::Markdown => {
                if let Err(e) = markdown::write_report(digest, output_dir, stem).await {
                    error!(error = %e, "Failed to write Markdown report");
                }
            }
        }
    }
}
