//! Editorial scrapers.
//!
//! Scraping follows the same two-phase pattern for every source:
//!
//! 1. **Discovery**: find article URLs on the source's listing page
//! 2. **Extraction**: fetch each article and isolate its title and body text
//!
//! Everything that depends on one site's markup lives behind the
//! [`SiteAdapter`] trait, so the [`session`] orchestrator never changes when a
//! source is added.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing page |
//! |--------|--------|--------------|
//! | The Hindu | [`thehindu`] | `https://www.thehindu.com/opinion/editorial/` |

use crate::error::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub mod session;
pub mod thehindu;

/// Markup knowledge for one news source.
pub trait SiteAdapter {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// The page listing the source's editorials.
    fn listing_url(&self) -> &str;

    /// Absolute, unique editorial URLs in document order, at most `max_count`.
    /// An empty result means "no content available", not an error.
    fn discover_links(&self, listing_html: &str, max_count: usize) -> Vec<String>;

    /// The article headline, or a fixed placeholder.
    fn extract_title(&self, article_html: &str) -> String;

    /// The filtered body text, or a fixed placeholder.
    fn extract_content(&self, article_html: &str) -> String;
}

/// "Given a URL, return the HTML text or fail."
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// [`Fetch`] over HTTP GET with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let transport = |source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
        let resp = self.client.get(parsed).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_fetcher_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opinion/editorial/")
            .with_status(200)
            .with_body("<html><body>listing</body></html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/opinion/editorial/", server.url());
        let body = fetcher.fetch(&url).await.unwrap();
        assert!(body.contains("listing"));
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_relative_url() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch("/opinion/editorial/").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_http_fetcher_transport_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is not served in the test environment.
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Transport { .. }));
    }
}
