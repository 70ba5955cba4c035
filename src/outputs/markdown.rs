//! Markdown report rendering.
//!
//! The report opens with a table of contents (one entry per article, in
//! article-number order) followed by one section per article:
//!
//! ```text
//! # Editorial Analysis: 2025-05-06
//!
//! ## 1. Headline
//! ### Central Idea
//! ### Tone of the Author
//! ### Paragraph-wise Summary
//! ### Vocabulary Builder
//! ### Critical Thinking
//! ### Takeaway
//! ```
//!
//! Analyses that failed validation are rendered field by field from the raw
//! mapping, under a note saying so.

use super::{field_heading, value_lines};
use crate::models::{ArticleAnalysis, EditorialDigest};
use crate::schema::{Analysis, AnalysisResult};
use crate::utils::{slugify_title, upcase};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render the whole digest as Markdown.
pub fn digest_to_markdown(digest: &EditorialDigest) -> String {
    let mut md = String::new();
    let session = &digest.session;

    let _ = writeln!(
        md,
        "# Editorial Analysis: {}\n",
        session.scraped_at.format("%Y-%m-%d")
    );
    let _ = writeln!(
        md,
        "_Scraped at {} · {} article(s) · {} analysed_\n",
        session.scraped_at.format("%Y-%m-%d %H:%M"),
        session.total_articles,
        digest.analysed_count()
    );

    if let Some(message) = &session.message {
        let _ = writeln!(md, "> **Scrape failed:** {message}\n");
    }

    if !digest.analyses.is_empty() {
        let _ = writeln!(md, "## Contents\n");
        for entry in &digest.analyses {
            let _ = writeln!(
                md,
                "- [{}. {}](#{})",
                entry.article_number,
                entry.title,
                anchor(entry)
            );
        }
        md.push('\n');
    }

    for entry in &digest.analyses {
        article_section(&mut md, entry);
    }

    md
}

fn anchor(entry: &ArticleAnalysis) -> String {
    slugify_title(&format!("{} {}", entry.article_number, entry.title))
}

fn article_section(md: &mut String, entry: &ArticleAnalysis) {
    let _ = writeln!(md, "## {}. {}\n", entry.article_number, entry.title);
    let _ = writeln!(md, "<small>{}</small>\n", entry.url);

    match &entry.analysis {
        Some(Analysis::Validated(result)) => validated_section(md, result),
        Some(Analysis::Unvalidated(map)) => unvalidated_section(md, map),
        None => {
            let _ = writeln!(md, "_No analysis available for this article._\n");
        }
    }
}

fn validated_section(md: &mut String, result: &AnalysisResult) {
    let _ = writeln!(md, "### Central Idea\n\n{}\n", result.central_idea);
    let _ = writeln!(
        md,
        "### Tone of the Author\n\n{}\n",
        upcase(result.tone_of_author.as_str())
    );

    let _ = writeln!(md, "### Paragraph-wise Summary\n");
    for (i, paragraph) in result.paragraph_wise_summary.iter().enumerate() {
        let _ = writeln!(md, "{}. {}", i + 1, paragraph);
    }
    md.push('\n');

    let _ = writeln!(md, "### Vocabulary Builder\n");
    let _ = writeln!(md, "| Word | Meaning | Example |");
    let _ = writeln!(md, "|------|---------|---------|");
    for entry in &result.vocabulary_builder {
        let _ = writeln!(
            md,
            "| **{}** | {} | _{}_ |",
            table_cell(&entry.word),
            table_cell(&entry.meaning),
            table_cell(&entry.example_usage)
        );
    }
    md.push('\n');

    let _ = writeln!(md, "### Critical Thinking\n");
    for (i, q) in result.critical_thinking_questions.iter().enumerate() {
        let _ = writeln!(md, "{}. {} <small>`{}`</small>", i + 1, q.question, q.question_type);
    }
    md.push('\n');

    let _ = writeln!(md, "### Takeaway\n\n> {}\n", result.takeaway);
}

fn unvalidated_section(md: &mut String, map: &Map<String, Value>) {
    let _ = writeln!(
        md,
        "> _This analysis did not pass schema validation and is shown as received._\n"
    );
    for (key, value) in map {
        let _ = writeln!(md, "### {}\n", field_heading(key));
        for line in value_lines(value) {
            let _ = writeln!(md, "- {line}");
        }
        md.push('\n');
    }
}

fn table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Write the Markdown report to `{output_dir}/{stem}.md`.
#[instrument(level = "info", skip_all, fields(%output_dir, %stem))]
pub async fn write_report(
    digest: &EditorialDigest,
    output_dir: &str,
    stem: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = Path::new(output_dir).join(format!("{stem}.md"));
    fs::write(&path, digest_to_markdown(digest)).await?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::without_analysis;
    use crate::models::{ArticleRecord, ScrapeSession};
    use crate::schema::tests::valid_analysis_json;
    use serde_json::json;

    fn digest_with(analysis: Option<Analysis>) -> EditorialDigest {
        let session = ScrapeSession::completed(vec![ArticleRecord::scraped(
            1,
            "https://www.thehindu.com/opinion/editorial/a/article1.ece".to_string(),
            "A fiscal tightrope".to_string(),
            "Body".to_string(),
        )]);
        let mut digest = without_analysis(session);
        digest.analyses[0].analysis = analysis;
        digest
    }

    #[test]
    fn test_validated_report_sections() {
        let result = serde_json::from_value(valid_analysis_json()).unwrap();
        let md = digest_to_markdown(&digest_with(Some(Analysis::Validated(result))));

        assert!(md.contains("- [1. A fiscal tightrope](#1-a-fiscal-tightrope)"));
        assert!(md.contains("## 1. A fiscal tightrope"));
        assert!(md.contains("### Tone of the Author\n\nAnalytical"));
        assert!(md.contains("| **prudence** | careful judgement | _Fiscal prudence won praise._ |"));
        assert!(md.contains("2. What is the main claim? <small>`main idea`</small>"));
        assert!(md.contains("> Watch how the author balances two competing goals."));
    }

    #[test]
    fn test_unvalidated_report_is_rendered() {
        let mut map = Map::new();
        map.insert("central_idea".to_string(), json!("Short idea"));
        map.insert("extra_notes".to_string(), json!(["one", "two"]));
        let md = digest_to_markdown(&digest_with(Some(Analysis::Unvalidated(map))));

        assert!(md.contains("did not pass schema validation"));
        assert!(md.contains("### Central idea\n\n- Short idea"));
        assert!(md.contains("### Extra notes\n\n- one\n- two"));
    }

    #[test]
    fn test_missing_analysis_note() {
        let md = digest_to_markdown(&digest_with(None));
        assert!(md.contains("_No analysis available for this article._"));
    }

    #[test]
    fn test_failed_session_report() {
        let md = digest_to_markdown(&without_analysis(ScrapeSession::failed("No editorial links found")));
        assert!(md.contains("> **Scrape failed:** No editorial links found"));
        assert!(!md.contains("## Contents"));
    }

    #[tokio::test]
    async fn test_write_report() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let path = write_report(&digest_with(None), dir, "daily").await.unwrap();
        assert_eq!(path, tmp.path().join("daily.md"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("# Editorial Analysis"));
    }
}
