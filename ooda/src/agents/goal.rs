//! Goal agent: derives the problem statement from the conversation.

use serde::Deserialize;

use crate::core::parse::parse_or;
use crate::io::prompt::Fields;

#[derive(Debug, Deserialize)]
struct ProblemStatementReply {
    #[serde(rename = "problem statement", default)]
    problem_statement: String,
}

/// The template needs nothing beyond the conversation itself.
pub(super) fn fields() -> Fields {
    Fields::new()
}

/// The `problem statement` field. A malformed completion falls back to
/// `latest`, the newest message the user-facing conversation holds.
pub(super) fn decode(completion: &str, latest: &str) -> String {
    let fallback = ProblemStatementReply {
        problem_statement: latest.to_string(),
    };
    parse_or(completion, fallback).problem_statement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::TaskAgent;
    use crate::core::types::Message;
    use crate::io::prompt::PromptBook;
    use crate::test_support::{ScriptedLm, conversation};

    #[test]
    fn returns_the_problem_statement() {
        let lm = ScriptedLm::new([
            r#"{"problem statement": "Compute FY2022 free cash flow for 3M."}"#,
        ]);
        let book = PromptBook::new();
        let history = vec![
            Message::user("What is 3M's free cash flow?"),
            Message::assistant("For which year?"),
            Message::user("FY2022"),
        ];
        let agent = TaskAgent::goal(&lm, &book, &history);

        let got = agent.execute("").expect("execute");

        assert_eq!(
            got.as_text(),
            Some("Compute FY2022 free cash flow for 3M.")
        );
        let sent = lm.last_messages().expect("call");
        assert_eq!(&sent[..3], history.as_slice());
        assert!(sent[3].content.contains(r#"{"problem statement""#));
    }

    #[test]
    fn malformed_reply_falls_back_to_newest_message() {
        let book = PromptBook::new();
        for len in [1, 5, 10, 23] {
            let history = conversation(len);
            let lm = ScriptedLm::new(["not json"]);
            let agent = TaskAgent::goal(&lm, &book, &history);
            let got = agent.execute("").expect("execute");
            assert_eq!(got.as_text(), Some(history[len - 1].content.as_str()));
        }
    }

    #[test]
    fn malformed_reply_without_history_is_empty() {
        let lm = ScriptedLm::new(["<html>"]);
        let book = PromptBook::new();
        let agent = TaskAgent::goal(&lm, &book, &[]);
        assert_eq!(agent.execute("").expect("execute").as_text(), Some(""));
    }

    #[test]
    fn missing_field_is_empty_not_fallback() {
        assert_eq!(decode(r#"{"statement": "x"}"#, "latest"), "");
        assert_eq!(decode("42", "latest"), "latest");
        assert_eq!(decode(r#"{"problem statement": null}"#, "latest"), "latest");
    }
}
