//! Data models for scraped editorials and the session envelope.
//!
//! This module defines the records that flow through one pipeline run:
//! - [`ArticleRecord`]: one scrape attempt for one discovered editorial link
//! - [`ScrapeSession`]: the ordered result of a whole scrape, serialized as
//!   the JSON session envelope consumed by report tooling
//! - [`ArticleAnalysis`] / [`EditorialDigest`]: the session joined with the
//!   per-article model analyses
//!
//! Field names of the envelope (`status`, `total_articles`, `scraped_at`,
//! `articles[].article_number`, ...) are a compatibility contract and must
//! not be renamed.

use crate::schema::Analysis;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Title used for records whose scrape raised an error.
pub const ERROR_TITLE: &str = "Error occurred";

/// Outcome of scraping a single article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Success,
    Error,
}

/// Outcome of a whole scrape session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Success,
    Error,
}

/// A single scraped editorial.
///
/// Records are created once per scrape attempt and never mutated; the
/// sequence number is the 1-based position in discovery order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// 1-based position in discovery order.
    #[serde(rename = "article_number")]
    pub sequence_number: usize,
    /// Absolute article URL.
    pub url: String,
    pub title: String,
    /// Filtered body text, a placeholder, or the failure description.
    pub content: String,
    pub status: ArticleStatus,
}

impl ArticleRecord {
    pub fn scraped(sequence_number: usize, url: String, title: String, content: String) -> Self {
        Self {
            sequence_number,
            url,
            title,
            content,
            status: ArticleStatus::Success,
        }
    }

    pub fn failed(sequence_number: usize, url: String, error: &dyn std::fmt::Display) -> Self {
        Self {
            sequence_number,
            url,
            title: ERROR_TITLE.to_string(),
            content: format!("Failed to scrape article: {error}"),
            status: ArticleStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ArticleStatus::Success
    }
}

/// The envelope produced by one scrape run.
///
/// # JSON Shape
///
/// ```text
/// {
///   "status": "success",
///   "total_articles": 2,
///   "scraped_at": "2025-05-06T08:00:00.123+05:30",
///   "articles": [{ "article_number": 1, "url": ..., "title": ..., "content": ..., "status": "success" }]
/// }
/// ```
///
/// Error sessions additionally carry a `message` field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrapeSession {
    pub status: SessionStatus,
    /// Why the session failed; absent on successful sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_articles: usize,
    pub scraped_at: DateTime<Local>,
    pub articles: Vec<ArticleRecord>,
}

impl ScrapeSession {
    /// A session that produced no articles at all.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Error,
            message: Some(message.into()),
            total_articles: 0,
            scraped_at: Local::now(),
            articles: Vec::new(),
        }
    }

    /// A session whose link discovery succeeded; individual records may still
    /// carry `status: error`.
    pub fn completed(articles: Vec<ArticleRecord>) -> Self {
        Self {
            status: SessionStatus::Success,
            message: None,
            total_articles: articles.len(),
            scraped_at: Local::now(),
            articles,
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.articles.iter().filter(|a| a.is_success()).count()
    }
}

/// Model analysis attached to one scraped article.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleAnalysis {
    pub article_number: usize,
    pub url: String,
    pub title: String,
    /// `None` when the article was not analysed or the model step failed.
    pub analysis: Option<Analysis>,
}

/// The combined result of a run: the scrape envelope plus one analysis slot
/// per article, in the same order.
#[derive(Debug, Clone, Serialize)]
pub struct EditorialDigest {
    pub session: ScrapeSession,
    pub analyses: Vec<ArticleAnalysis>,
}

impl EditorialDigest {
    pub fn analysed_count(&self) -> usize {
        self.analyses.iter().filter(|a| a.analysis.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> ScrapeSession {
        ScrapeSession::completed(vec![
            ArticleRecord::scraped(
                1,
                "https://www.thehindu.com/opinion/editorial/first/article1.ece".to_string(),
                "First".to_string(),
                "Body one".to_string(),
            ),
            ArticleRecord::failed(
                2,
                "https://www.thehindu.com/opinion/editorial/second/article2.ece".to_string(),
                &"connection reset",
            ),
        ])
    }

    #[test]
    fn test_completed_session_counts_articles() {
        let session = sample_session();
        assert_eq!(session.status, SessionStatus::Success);
        assert_eq!(session.total_articles, session.articles.len());
        assert_eq!(session.succeeded_count(), 1);
        assert!(session.message.is_none());
    }

    #[test]
    fn test_failed_record_fields() {
        let record = ArticleRecord::failed(3, "https://x/article3".to_string(), &"timed out");
        assert_eq!(record.title, ERROR_TITLE);
        assert_eq!(record.status, ArticleStatus::Error);
        assert_eq!(record.content, "Failed to scrape article: timed out");
    }

    #[test]
    fn test_session_envelope_field_names() {
        let json = serde_json::to_value(sample_session()).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["total_articles"], 2);
        assert!(json["scraped_at"].is_string());
        assert!(json.get("message").is_none());

        let first = &json["articles"][0];
        assert_eq!(first["article_number"], 1);
        assert_eq!(first["status"], "success");
        assert!(first.get("sequence_number").is_none());
        assert_eq!(json["articles"][1]["status"], "error");
    }

    #[test]
    fn test_failed_session_envelope() {
        let json = serde_json::to_value(ScrapeSession::failed("No editorial links found")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "No editorial links found");
        assert_eq!(json["total_articles"], 0);
        assert_eq!(json["articles"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_session_json_preserves_order_and_count() {
        let session = sample_session();
        let json = serde_json::to_string_pretty(&session).unwrap();
        let parsed: ScrapeSession = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.total_articles, session.total_articles);
        let urls: Vec<_> = parsed.articles.iter().map(|a| a.url.as_str()).collect();
        let expected: Vec<_> = session.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, expected);
        assert_eq!(parsed.articles[1].sequence_number, 2);
    }
}
