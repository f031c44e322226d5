//! Synthesizer: answers the query from the gathered context.

use serde_json::{Map, Value};

use crate::io::prompt::Fields;

use super::{context_query_fields, decode_mapping};

pub(super) fn fields(context: &str, query: &str) -> Fields {
    context_query_fields(context, query)
}

pub(super) fn decode(completion: &str) -> Map<String, Value> {
    decode_mapping(completion)
}

#[cfg(test)]
mod tests {
    use crate::agents::TaskAgent;
    use crate::io::prompt::PromptBook;
    use crate::test_support::{ScriptedLm, conversation};
    use serde_json::json;

    #[test]
    fn returns_the_synthesized_fields() {
        let lm = ScriptedLm::new([
            r#"{"answer": "$5.6B", "supporting_evidence": ["OCF $7.4B", "capex $1.8B"]}"#,
        ]);
        let book = PromptBook::new();
        let history = conversation(11);
        let agent = TaskAgent::synthesizer(&lm, &book, "OCF $7.4B; capex $1.8B", &history);

        let got = agent.execute("What is the free cash flow?").expect("execute");
        let answer = got.as_structured().expect("mapping");

        assert_eq!(answer["answer"], json!("$5.6B"));
        assert_eq!(answer["supporting_evidence"][1], json!("capex $1.8B"));
        let sent = lm.last_messages().expect("call");
        assert_eq!(sent.len(), 10);
        assert_eq!(&sent[..9], &history[1..10]);
        assert!(sent[9].content.contains("OCF $7.4B; capex $1.8B"));
    }

    #[test]
    fn malformed_reply_is_empty_mapping() {
        let lm = ScriptedLm::new(["The answer is $5.6B."]);
        let book = PromptBook::new();
        let agent = TaskAgent::synthesizer(&lm, &book, "ctx", &conversation(3));
        let got = agent.execute("q").expect("execute");
        assert!(got.into_structured().expect("mapping").is_empty());
    }
}
