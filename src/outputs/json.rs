//! JSON output.
//!
//! Two shapes are written, both pretty-printed:
//! - the bare session envelope (`status`, `total_articles`, `scraped_at`,
//!   `articles`) for scrape-only runs
//! - the digest `{ "session": <envelope>, "analyses": [...] }` otherwise
//!
//! The envelope's field names are consumed by existing tooling; they come
//! straight from [`crate::models::ScrapeSession`]'s serde attributes.

use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `value` to `{output_dir}/{stem}.json`.
#[instrument(level = "info", skip_all, fields(%output_dir, %stem))]
pub async fn write_json<T: Serialize>(
    value: &T,
    output_dir: &str,
    stem: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir).join(format!("{stem}.json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(path)
}
