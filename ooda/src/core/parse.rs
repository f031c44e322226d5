//! Best-effort decoding of structured model output.
//!
//! Structured-output compliance is probabilistic, so a completion that does not
//! decode is never an error here: the caller supplies the value to use instead.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Decode `text` as JSON of type `T`, returning `default` when it does not fit.
pub fn parse_or<T: DeserializeOwned>(text: &str, default: T) -> T {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, bytes = text.len(), "malformed structured output, using fallback");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{Map, Value, json};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        #[serde(default)]
        question: String,
    }

    #[test]
    fn valid_json_is_decoded() {
        let got: Map<String, Value> = parse_or(r#"{"ok": true}"#, Map::new());
        assert_eq!(got.get("ok"), Some(&json!(true)));
    }

    #[test]
    fn invalid_json_yields_default() {
        let got: Map<String, Value> = parse_or("not json {", Map::new());
        assert!(got.is_empty());
    }

    #[test]
    fn shape_mismatch_yields_default() {
        let fallback = Reply {
            question: "fallback".to_string(),
        };
        let got = parse_or(r#""just a string""#, fallback);
        assert_eq!(got.question, "fallback");

        let got = parse_or(
            r#"{"question": 7}"#,
            Reply {
                question: String::new(),
            },
        );
        assert_eq!(got.question, "");
    }

    #[test]
    fn missing_field_uses_serde_default_not_fallback() {
        let got = parse_or(
            r#"{"other": "x"}"#,
            Reply {
                question: "fallback".to_string(),
            },
        );
        assert_eq!(got.question, "");
    }
}
