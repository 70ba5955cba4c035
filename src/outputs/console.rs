//! Plain-text report for the terminal.

use super::{field_heading, value_lines};
use crate::models::EditorialDigest;
use crate::schema::Analysis;
use crate::utils::upcase;
use std::fmt::Write;

const RULE: &str = "============================================================";

pub fn render(digest: &EditorialDigest) -> String {
    let mut out = String::new();
    let session = &digest.session;

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "EDITORIAL ANALYSIS  {}  ({} article(s), {} analysed)",
        session.scraped_at.format("%Y-%m-%d %H:%M"),
        session.total_articles,
        digest.analysed_count()
    );
    let _ = writeln!(out, "{RULE}");

    if let Some(message) = &session.message {
        let _ = writeln!(out, "Scrape failed: {message}");
        return out;
    }

    for entry in &digest.analyses {
        let _ = writeln!(out, "\n[{}] {}", entry.article_number, entry.title);
        let _ = writeln!(out, "    {}", entry.url);

        match &entry.analysis {
            Some(Analysis::Validated(result)) => {
                let _ = writeln!(out, "\nCENTRAL IDEA\n  {}", result.central_idea);
                let _ = writeln!(out, "\nTONE\n  {}", upcase(result.tone_of_author.as_str()));
                let _ = writeln!(out, "\nPARAGRAPH-WISE SUMMARY");
                for (i, p) in result.paragraph_wise_summary.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", i + 1, p);
                }
                let _ = writeln!(out, "\nVOCABULARY");
                for v in &result.vocabulary_builder {
                    let _ = writeln!(out, "  * {}: {}\n      e.g. {}", v.word, v.meaning, v.example_usage);
                }
                let _ = writeln!(out, "\nCRITICAL THINKING");
                for (i, q) in result.critical_thinking_questions.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {} [{}]", i + 1, q.question, q.question_type);
                }
                let _ = writeln!(out, "\nTAKEAWAY\n  {}", result.takeaway);
            }
            Some(Analysis::Unvalidated(map)) => {
                let _ = writeln!(out, "\n(analysis failed validation; shown as received)");
                for (key, value) in map {
                    let _ = writeln!(out, "\n{}", field_heading(key).to_uppercase());
                    for line in value_lines(value) {
                        let _ = writeln!(out, "  {line}");
                    }
                }
            }
            None => {
                let _ = writeln!(out, "\n(no analysis available)");
            }
        }
        let _ = writeln!(out, "\n{RULE}");
    }

    out
}

pub fn print_report(digest: &EditorialDigest) {
    print!("{}", render(digest));
}
