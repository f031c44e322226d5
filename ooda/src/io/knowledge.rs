//! Knowledge injection: turns background knowledge into chat history.

use anyhow::Result;

use crate::core::types::{Conversation, Message};
use crate::io::prompt::{Fields, PromptBook, TemplateId};

/// Render `knowledge` into history to place ahead of a prompt.
///
/// Entries keep the order given and are separated by blank lines. Empty
/// knowledge yields empty history rather than an empty system message.
pub fn knowledge_history(prompts: &PromptBook, knowledge: &[String]) -> Result<Conversation> {
    let entries: Vec<&str> = knowledge
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    let fields = Fields::from([("knowledge", entries.join("\n\n"))]);
    let content = prompts.render(TemplateId::KnowledgeInjection, &fields)?;
    Ok(vec![Message::system(content)])
}
