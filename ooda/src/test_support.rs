//! Test-only helpers: a scripted language model and conversation builders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::types::{Conversation, Message};
use crate::io::lm::{LanguageModel, ResponseFormat};
use crate::io::prompt::TemplateId;

/// One recorded invocation of a [`ScriptedLm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmCall {
    pub messages: Vec<Message>,
    pub format: ResponseFormat,
}

/// Language model that replays queued completions in order and records calls.
///
/// Errors once the script is exhausted, so an unexpected extra call fails the
/// test instead of returning a made-up completion.
#[derive(Debug, Default)]
pub struct ScriptedLm {
    responses: RefCell<VecDeque<String>>,
    calls: RefCell<Vec<LmCall>>,
}

impl ScriptedLm {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<LmCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Messages sent on the most recent call.
    pub fn last_messages(&self) -> Option<Vec<Message>> {
        self.calls.borrow().last().map(|call| call.messages.clone())
    }
}

impl LanguageModel for ScriptedLm {
    fn call(&self, messages: &[Message], format: ResponseFormat) -> Result<String> {
        self.calls.borrow_mut().push(LmCall {
            messages: messages.to_vec(),
            format,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted LM has no response left"))
    }
}

/// Language model whose every call fails, standing in for a transport error.
#[derive(Debug, Default)]
pub struct FailingLm;

impl LanguageModel for FailingLm {
    fn call(&self, _messages: &[Message], _format: ResponseFormat) -> Result<String> {
        Err(anyhow!("LM unavailable"))
    }
}

/// Deterministic history alternating user/assistant turns: `turn 0`, `turn 1`, ...
pub fn conversation(len: usize) -> Conversation {
    (0..len)
        .map(|i| {
            if i % 2 == 0 {
                Message::user(format!("turn {i}"))
            } else {
                Message::assistant(format!("turn {i}"))
            }
        })
        .collect()
}

/// Write `<template-id>.md` override files into a fresh temp directory.
pub fn prompt_overrides(templates: &[(TemplateId, &str)]) -> Result<TempDir> {
    let dir = tempfile::tempdir().context("create prompts tempdir")?;
    for (id, source) in templates {
        let path = dir.path().join(format!("{}.md", id.as_str()));
        fs::write(&path, source).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(dir)
}
