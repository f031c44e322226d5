//! Language-model capability.
//!
//! The [`LanguageModel`] trait decouples agent orchestration from the actual
//! model backend. Transport concerns (HTTP, auth, retries, timeouts) belong to
//! the implementation; errors it returns are propagated to callers unchanged.
//! Tests use scripted models that return predetermined completions.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::types::Message;

/// Output mode requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// A single JSON object. Requested, never verified by the backend contract.
    JsonObject,
}

/// A chat-completion capability: ordered messages in, one completion out.
pub trait LanguageModel {
    fn call(&self, messages: &[Message], format: ResponseFormat) -> Result<String>;
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    fn call(&self, messages: &[Message], format: ResponseFormat) -> Result<String> {
        (**self).call(messages, format)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    fn call(&self, messages: &[Message], format: ResponseFormat) -> Result<String> {
        (**self).call(messages, format)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    fn call(&self, messages: &[Message], format: ResponseFormat) -> Result<String> {
        (**self).call(messages, format)
    }
}
