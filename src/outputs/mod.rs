//! Report generation for a finished run.
//!
//! # Submodules
//!
//! - [`console`]: prints a readable report to stdout
//! - [`json`]: writes the session envelope or the full digest as JSON
//! - [`markdown`]: renders the digest as a Markdown report
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── editorial_analysis_20250506_083015.json
//! └── editorial_analysis_20250506_083015.md
//! ```

pub mod console;
pub mod json;
pub mod markdown;

use serde_json::{Map, Value};

/// Human heading for a schema field name, e.g. `tone_of_author` -> `Tone of author`.
pub(crate) fn field_heading(key: &str) -> String {
    crate::utils::upcase(&key.replace('_', " "))
}

/// Flatten one JSON value into display lines, used for analyses that failed
/// validation and therefore have no fixed shape.
pub(crate) fn value_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().map(inline_value).collect(),
        Value::Object(map) => vec![inline_object(map)],
        other => vec![other.to_string()],
    }
}

fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => inline_object(map),
        other => other.to_string(),
    }
}

fn inline_object(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}: {}", field_heading(k), inline_value(v)))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_heading() {
        assert_eq!(field_heading("tone_of_author"), "Tone of author");
    }

    #[test]
    fn test_value_lines() {
        assert_eq!(value_lines(&json!("one")), vec!["one"]);
        assert_eq!(
            value_lines(&json!([{ "word": "terse" }, "plain"])),
            vec!["Word: terse", "plain"]
        );
        assert_eq!(value_lines(&json!(7)), vec!["7"]);
        assert!(value_lines(&Value::Null).is_empty());
    }
}
