//! Scrape orchestration: listing page, link discovery, then each article in
//! turn.
//!
//! The run is strictly sequential. A fixed delay separates successive article
//! fetches so the source server only ever sees one request at a time, and a
//! failure on one article is recorded in that article's record without
//! stopping the rest of the batch.

use super::{Fetch, SiteAdapter};
use crate::models::{ArticleRecord, ScrapeSession};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

pub const LISTING_FETCH_FAILED: &str = "Failed to fetch editorial listing";
pub const NO_LINKS_FOUND: &str = "No editorial links found";

/// Process-wide politeness policy for one scrape.
#[derive(Debug, Clone, Copy)]
pub struct ScrapePolicy {
    /// Pause between successive article fetches.
    pub request_delay: Duration,
}

impl Default for ScrapePolicy {
    fn default() -> Self {
        Self {
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Scrape up to `num_articles` editorials from `listing_url`.
///
/// Always yields a session. A listing fetch failure or an empty discovery
/// produces `status: error` with no articles and an explanatory `message`;
/// otherwise the session is `success` and every discovered link has exactly
/// one record, numbered from 1 in discovery order.
#[instrument(level = "info", skip(adapter, fetcher, policy), fields(source = adapter.name()))]
pub async fn scrape<A, F>(
    adapter: &A,
    fetcher: &F,
    listing_url: &str,
    num_articles: usize,
    policy: ScrapePolicy,
) -> ScrapeSession
where
    A: SiteAdapter + ?Sized,
    F: Fetch,
{
    let listing_html = match fetcher.fetch(listing_url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Listing fetch failed; aborting session");
            return ScrapeSession::failed(format!("{LISTING_FETCH_FAILED}: {e}"));
        }
    };

    let links = adapter.discover_links(&listing_html, num_articles);
    if links.is_empty() {
        warn!("No qualifying editorial links on listing page");
        return ScrapeSession::failed(NO_LINKS_FOUND);
    }
    info!(count = links.len(), "Indexed editorial links");

    let mut articles = Vec::with_capacity(links.len());
    for (idx, url) in links.into_iter().enumerate() {
        if idx > 0 && !policy.request_delay.is_zero() {
            sleep(policy.request_delay).await;
        }

        let sequence_number = idx + 1;
        let record = match fetcher.fetch(&url).await {
            Ok(html) => {
                let title = adapter.extract_title(&html);
                let content = adapter.extract_content(&html);
                info!(sequence_number, %url, chars = content.chars().count(), "Scraped article");
                ArticleRecord::scraped(sequence_number, url, title, content)
            }
            Err(e) => {
                error!(sequence_number, %url, error = %e, "Article fetch failed");
                ArticleRecord::failed(sequence_number, url, &e)
            }
        };
        articles.push(record);
    }

    let session = ScrapeSession::completed(articles);
    info!(
        total = session.total_articles,
        succeeded = session.succeeded_count(),
        "Scrape session complete"
    );
    session
}
