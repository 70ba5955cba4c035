//! Editorial analysis: send article text to the model and check what comes
//! back against the analysis schema.
//!
//! # Outcomes
//!
//! | Model answer | Result |
//! |--------------|--------|
//! | call failed (transport, auth, quota) | `None` |
//! | not a JSON object | `None`, raw text logged |
//! | JSON object breaking the schema | [`Analysis::Unvalidated`] with a warning |
//! | JSON object meeting the schema | [`Analysis::Validated`] |
//!
//! A non-conforming but well-formed answer is never thrown away; report
//! consumers render whatever fields it has.

use crate::api::AskAsync;
use crate::models::{ArticleAnalysis, ArticleRecord, EditorialDigest, ScrapeSession};
use crate::schema::{Analysis, AnalysisResult};
use crate::scrapers::thehindu::CONTENT_PLACEHOLDER;
use crate::utils::{looks_truncated, truncate_for_log};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Runs the model over article text, one article at a time.
#[derive(Debug)]
pub struct Analyzer<A> {
    model: A,
}

impl<A: AskAsync> Analyzer<A> {
    pub fn new(model: A) -> Self {
        Self { model }
    }

    /// Analyse one article's text. `None` means "no analysis for this
    /// article"; callers carry on with the rest of the batch.
    #[instrument(level = "info", skip_all, fields(chars = article_text.chars().count()))]
    pub async fn analyze(&self, article_text: &str) -> Option<Analysis> {
        match self.model.ask(article_text).await {
            Ok(raw) => interpret(&raw),
            Err(e) => {
                error!(error = %e, "Model call failed; no analysis for this article");
                None
            }
        }
    }

    /// Analyse every successfully scraped article of `session`, in order.
    #[instrument(level = "info", skip_all, fields(total = session.total_articles))]
    pub async fn digest(&self, session: ScrapeSession) -> EditorialDigest {
        let analyses: Vec<ArticleAnalysis> = stream::iter(session.articles.iter())
            .then(|record| self.analyze_record(record))
            .collect()
            .await;

        let digest = EditorialDigest { session, analyses };
        let validated = digest
            .analyses
            .iter()
            .filter(|a| a.analysis.as_ref().is_some_and(Analysis::is_validated))
            .count();
        info!(
            analysed = digest.analysed_count(),
            validated,
            total = digest.analyses.len(),
            "Analysis complete"
        );
        digest
    }

    async fn analyze_record(&self, record: &ArticleRecord) -> ArticleAnalysis {
        let analysis = if is_analysable(record) {
            self.analyze(&record.content).await
        } else {
            debug!(article_number = record.sequence_number, "Skipping article without content");
            None
        };

        ArticleAnalysis {
            article_number: record.sequence_number,
            url: record.url.clone(),
            title: record.title.clone(),
            analysis,
        }
    }
}

/// An empty digest slot for every article, used when the model step is
/// skipped entirely.
pub fn without_analysis(session: ScrapeSession) -> EditorialDigest {
    let analyses = session
        .articles
        .iter()
        .map(|record| ArticleAnalysis {
            article_number: record.sequence_number,
            url: record.url.clone(),
            title: record.title.clone(),
            analysis: None,
        })
        .collect();
    EditorialDigest { session, analyses }
}

fn is_analysable(record: &ArticleRecord) -> bool {
    record.is_success() && !record.content.trim().is_empty() && record.content != CONTENT_PLACEHOLDER
}

/// Turn the model's raw text into an [`Analysis`].
pub fn interpret(raw: &str) -> Option<Analysis> {
    let payload = strip_code_fence(raw);

    let map = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(
                kind = json_kind(&other),
                response_preview = %truncate_for_log(raw, 300),
                "Model returned JSON that is not an object"
            );
            return None;
        }
        Err(e) => {
            warn!(
                error = %e,
                truncated = looks_truncated(&e),
                response_preview = %truncate_for_log(raw, 300),
                "Model returned unparseable output"
            );
            debug!(raw_response = %raw, "Full model response");
            return None;
        }
    };

    match serde_json::from_value::<AnalysisResult>(Value::Object(map.clone())) {
        Ok(result) => match result.validate() {
            Ok(()) => Some(Analysis::Validated(result)),
            Err(violation) => {
                warn!(%violation, "Analysis failed schema validation; keeping raw output");
                Some(Analysis::Unvalidated(map))
            }
        },
        Err(e) => {
            warn!(error = %e, "Analysis does not match schema; keeping raw output");
            Some(Analysis::Unvalidated(map))
        }
    }
}

/// Accept answers wrapped in a Markdown code fence.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
