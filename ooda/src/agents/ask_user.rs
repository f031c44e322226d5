//! Ask-user agent: decides whether to ask the user a clarifying question.
//!
//! The heuristic is the gate. With no heuristic the agent never reaches the
//! model and the answer is always "no question".

use serde::Deserialize;

use crate::core::parse::parse_or;
use crate::io::prompt::Fields;

#[derive(Debug, Default, Deserialize)]
struct AskUserReply {
    #[serde(default)]
    question: String,
}

pub(super) fn fields(problem_statement: &str, heuristic: &str) -> Fields {
    Fields::from([
        ("problem_statement", problem_statement.to_string()),
        ("heuristic", heuristic.to_string()),
    ])
}

/// The `question` field, or empty text when the completion is malformed.
pub(super) fn decode(completion: &str) -> String {
    parse_or(completion, AskUserReply::default()).question
}
