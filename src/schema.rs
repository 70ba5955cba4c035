//! The structured-output contract for editorial analyses.
//!
//! The model is asked to answer with a JSON object of this shape, and its
//! answer is checked against it in two steps: strict deserialization into
//! [`AnalysisResult`] (unknown fields are rejected), then
//! [`AnalysisResult::validate`] for the length and cardinality bounds that
//! serde cannot express.
//!
//! | field | constraint |
//! |-------|------------|
//! | `central_idea` | 30..=500 chars |
//! | `tone_of_author` | one of [`Tone`] |
//! | `paragraph_wise_summary` | at least 1 entry |
//! | `vocabulary_builder` | 4..=8 entries |
//! | `critical_thinking_questions` | 2..=4 entries |
//! | `takeaway` | 15..=200 chars |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::ops::RangeInclusive;
use thiserror::Error;

pub const CENTRAL_IDEA_CHARS: RangeInclusive<usize> = 30..=500;
pub const TAKEAWAY_CHARS: RangeInclusive<usize> = 15..=200;
pub const MIN_SUMMARY_PARAGRAPHS: usize = 1;
pub const VOCABULARY_COUNT: RangeInclusive<usize> = 4..=8;
pub const QUESTION_COUNT: RangeInclusive<usize> = 2..=4;

/// The author's tone, restricted to a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Critical,
    Analytical,
    Persuasive,
    Sarcastic,
    Objective,
    Reflective,
    Optimistic,
    Pessimistic,
    Neutral,
    Concerned,
}

impl Tone {
    pub const ALL: [Tone; 10] = [
        Tone::Critical,
        Tone::Analytical,
        Tone::Persuasive,
        Tone::Sarcastic,
        Tone::Objective,
        Tone::Reflective,
        Tone::Optimistic,
        Tone::Pessimistic,
        Tone::Neutral,
        Tone::Concerned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Critical => "critical",
            Tone::Analytical => "analytical",
            Tone::Persuasive => "persuasive",
            Tone::Sarcastic => "sarcastic",
            Tone::Objective => "objective",
            Tone::Reflective => "reflective",
            Tone::Optimistic => "optimistic",
            Tone::Pessimistic => "pessimistic",
            Tone::Neutral => "neutral",
            Tone::Concerned => "concerned",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A difficult word from the editorial, explained.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyEntry {
    pub word: String,
    /// Meaning in simple English.
    pub meaning: String,
    pub example_usage: String,
}

/// An inference-practice question.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CriticalQuestion {
    pub question: String,
    /// What the question tests, e.g. "main idea" or "author's assumption".
    pub question_type: String,
}

/// A validated editorial analysis.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    pub central_idea: String,
    pub tone_of_author: Tone,
    pub paragraph_wise_summary: Vec<String>,
    pub vocabulary_builder: Vec<VocabularyEntry>,
    pub critical_thinking_questions: Vec<CriticalQuestion>,
    /// One-line reading-skill tip.
    pub takeaway: String,
}

/// A bound the model's answer broke.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("{field} has {actual} characters, expected {min}..={max}")]
    Length {
        field: &'static str,
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("{field} has {actual} entries, expected {min}..={max}")]
    Count {
        field: &'static str,
        actual: usize,
        min: usize,
        max: usize,
    },
}

fn check_chars(
    field: &'static str,
    value: &str,
    bounds: &RangeInclusive<usize>,
) -> Result<(), SchemaViolation> {
    let actual = value.chars().count();
    if bounds.contains(&actual) {
        Ok(())
    } else {
        Err(SchemaViolation::Length {
            field,
            actual,
            min: *bounds.start(),
            max: *bounds.end(),
        })
    }
}

fn check_count(
    field: &'static str,
    actual: usize,
    bounds: &RangeInclusive<usize>,
) -> Result<(), SchemaViolation> {
    if bounds.contains(&actual) {
        Ok(())
    } else {
        Err(SchemaViolation::Count {
            field,
            actual,
            min: *bounds.start(),
            max: *bounds.end(),
        })
    }
}

impl AnalysisResult {
    /// Check the bounds serde cannot enforce. Reports the first violation.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_chars("central_idea", &self.central_idea, &CENTRAL_IDEA_CHARS)?;
        check_count(
            "paragraph_wise_summary",
            self.paragraph_wise_summary.len(),
            &(MIN_SUMMARY_PARAGRAPHS..=usize::MAX),
        )?;
        check_count(
            "vocabulary_builder",
            self.vocabulary_builder.len(),
            &VOCABULARY_COUNT,
        )?;
        check_count(
            "critical_thinking_questions",
            self.critical_thinking_questions.len(),
            &QUESTION_COUNT,
        )?;
        check_chars("takeaway", &self.takeaway, &TAKEAWAY_CHARS)
    }
}

/// What the invoker hands back for one article.
///
/// Both variants serialize as a plain JSON object so report consumers do not
/// need to care which one they got.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Validated(AnalysisResult),
    /// Well-formed JSON that broke the contract, kept as the model sent it.
    Unvalidated(Map<String, Value>),
}

impl Analysis {
    pub fn is_validated(&self) -> bool {
        matches!(self, Analysis::Validated(_))
    }

    pub fn as_validated(&self) -> Option<&AnalysisResult> {
        match self {
            Analysis::Validated(result) => Some(result),
            Analysis::Unvalidated(_) => None,
        }
    }
}

/// The response schema sent with every generation request, in the
/// OpenAPI subset the Gemini API accepts.
pub fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let tones: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "central_idea": {
                "type": "STRING",
                "minLength": CENTRAL_IDEA_CHARS.start(),
                "maxLength": CENTRAL_IDEA_CHARS.end(),
            },
            "tone_of_author": {
                "type": "STRING",
                "format": "enum",
                "enum": tones,
            },
            "paragraph_wise_summary": {
                "type": "ARRAY",
                "items": string,
                "minItems": MIN_SUMMARY_PARAGRAPHS,
            },
            "vocabulary_builder": {
                "type": "ARRAY",
                "minItems": VOCABULARY_COUNT.start(),
                "maxItems": VOCABULARY_COUNT.end(),
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": string,
                        "meaning": string,
                        "example_usage": string,
                    },
                    "required": ["word", "meaning", "example_usage"],
                    "propertyOrdering": ["word", "meaning", "example_usage"],
                },
            },
            "critical_thinking_questions": {
                "type": "ARRAY",
                "minItems": QUESTION_COUNT.start(),
                "maxItems": QUESTION_COUNT.end(),
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": string,
                        "question_type": string,
                    },
                    "required": ["question", "question_type"],
                    "propertyOrdering": ["question", "question_type"],
                },
            },
            "takeaway": {
                "type": "STRING",
                "minLength": TAKEAWAY_CHARS.start(),
                "maxLength": TAKEAWAY_CHARS.end(),
            },
        },
        "required": FIELDS,
        "propertyOrdering": FIELDS,
    })
}

const FIELDS: [&str; 6] = [
    "central_idea",
    "tone_of_author",
    "paragraph_wise_summary",
    "vocabulary_builder",
    "critical_thinking_questions",
    "takeaway",
];
