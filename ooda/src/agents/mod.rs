//! Task agents: single reasoning steps of the OODA loop.
//!
//! Every agent follows the same protocol: window the caller's conversation,
//! render a role-specific system prompt, make exactly one model call in JSON
//! mode, and decode the completion. Decoding never fails; each kind has a
//! fixed fallback value for output that does not match its contract.

mod ask_user;
mod context_validator;
mod goal;
mod ooda_planner;
mod synthesizer;

use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::core::parse::parse_or;
use crate::core::types::{Conversation, Message};
use crate::core::window::{DEFAULT_WINDOW_SIZE, WindowPolicy};
use crate::io::config::OodaConfig;
use crate::io::lm::{LanguageModel, ResponseFormat};
use crate::io::prompt::{Fields, PromptBook, TemplateId};

/// The reasoning step an agent performs, with its kind-specific inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentKind {
    /// Asks the user a clarifying question when the heuristic calls for one.
    AskUser { heuristic: String },
    /// Derives a problem statement from the conversation.
    Goal,
    /// Judges whether `context` is enough to answer the task.
    ContextValidator { context: String },
    /// Answers the task from `context`.
    Synthesizer { context: String },
    /// Produces a phased OODA plan for the conversation.
    OodaPlanner,
}

impl AgentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::AskUser { .. } => "ask_user",
            AgentKind::Goal => "goal",
            AgentKind::ContextValidator { .. } => "context_validator",
            AgentKind::Synthesizer { .. } => "synthesizer",
            AgentKind::OodaPlanner => "ooda_planner",
        }
    }

    pub fn template(&self) -> TemplateId {
        match self {
            AgentKind::AskUser { .. } => TemplateId::AskUser,
            AgentKind::Goal => TemplateId::DeriveProblemStatement,
            AgentKind::ContextValidator { .. } => TemplateId::ContentValidation,
            AgentKind::Synthesizer { .. } => TemplateId::SynthesizeResult,
            AgentKind::OodaPlanner => TemplateId::GenerateOodaPlan,
        }
    }

    /// Validator and synthesizer judge established context, so they leave the
    /// newest turn out of their window.
    pub fn window_policy(&self, window_size: usize) -> WindowPolicy {
        match self {
            AgentKind::ContextValidator { .. } | AgentKind::Synthesizer { .. } => {
                WindowPolicy::RecentExcludingNewest(window_size)
            }
            AgentKind::AskUser { .. } | AgentKind::Goal | AgentKind::OodaPlanner => {
                WindowPolicy::Recent(window_size)
            }
        }
    }
}

/// Configuration for a task-agent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAgentConfig {
    pub kind: AgentKind,
    pub window_size: usize,
}

impl TaskAgentConfig {
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Per-agent config from loaded settings. An ask-user kind without its
    /// own heuristic takes `cfg.ask_user_heuristic`.
    pub fn from_config(kind: AgentKind, cfg: &OodaConfig) -> Self {
        let kind = match kind {
            AgentKind::AskUser { heuristic } if heuristic.trim().is_empty() => {
                AgentKind::AskUser {
                    heuristic: cfg.ask_user_heuristic.trim().to_string(),
                }
            }
            other => other,
        };
        Self {
            kind,
            window_size: cfg.window_size,
        }
    }
}

/// Result of a task agent: free text or a JSON mapping, depending on the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    Text(String),
    Structured(Map<String, Value>),
}

impl AgentOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AgentOutput::Text(text) => Some(text),
            AgentOutput::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Map<String, Value>> {
        match self {
            AgentOutput::Structured(map) => Some(map),
            AgentOutput::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            AgentOutput::Text(text) => Some(text),
            AgentOutput::Structured(_) => None,
        }
    }

    pub fn into_structured(self) -> Option<Map<String, Value>> {
        match self {
            AgentOutput::Structured(map) => Some(map),
            AgentOutput::Text(_) => None,
        }
    }
}

/// A task agent bound to a model, a prompt book and a windowed conversation.
///
/// The agent keeps its own windowed copy of the history; the caller's
/// conversation is only read. Agents hold no other state between calls.
pub struct TaskAgent<'a, L: ?Sized> {
    lm: &'a L,
    prompts: &'a PromptBook,
    config: TaskAgentConfig,
    conversation: Conversation,
    /// Content of the newest message of the caller's conversation.
    newest: Option<String>,
}

impl<'a, L: LanguageModel + ?Sized> TaskAgent<'a, L> {
    /// Build an agent over `conversation` (empty when there is no history yet).
    pub fn new(
        lm: &'a L,
        prompts: &'a PromptBook,
        config: TaskAgentConfig,
        conversation: &[Message],
    ) -> Self {
        let windowed = config
            .kind
            .window_policy(config.window_size)
            .apply(conversation);
        Self {
            lm,
            prompts,
            conversation: windowed,
            newest: conversation.last().map(|m| m.content.clone()),
            config,
        }
    }

    pub fn ask_user(
        lm: &'a L,
        prompts: &'a PromptBook,
        heuristic: &str,
        conversation: &[Message],
    ) -> Self {
        let kind = AgentKind::AskUser {
            heuristic: heuristic.to_string(),
        };
        Self::new(lm, prompts, TaskAgentConfig::new(kind), conversation)
    }

    pub fn goal(lm: &'a L, prompts: &'a PromptBook, conversation: &[Message]) -> Self {
        Self::new(
            lm,
            prompts,
            TaskAgentConfig::new(AgentKind::Goal),
            conversation,
        )
    }

    pub fn context_validator(
        lm: &'a L,
        prompts: &'a PromptBook,
        context: impl Into<String>,
        conversation: &[Message],
    ) -> Self {
        let kind = AgentKind::ContextValidator {
            context: context.into(),
        };
        Self::new(lm, prompts, TaskAgentConfig::new(kind), conversation)
    }

    pub fn synthesizer(
        lm: &'a L,
        prompts: &'a PromptBook,
        context: impl Into<String>,
        conversation: &[Message],
    ) -> Self {
        let kind = AgentKind::Synthesizer {
            context: context.into(),
        };
        Self::new(lm, prompts, TaskAgentConfig::new(kind), conversation)
    }

    pub fn ooda_planner(
        lm: &'a L,
        prompts: &'a PromptBook,
        conversation: &[Message],
    ) -> Self {
        Self::new(
            lm,
            prompts,
            TaskAgentConfig::new(AgentKind::OodaPlanner),
            conversation,
        )
    }

    pub fn kind(&self) -> &AgentKind {
        &self.config.kind
    }

    /// The windowed history sent ahead of the system prompt.
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    /// Run the reasoning step for `task`.
    ///
    /// Errors only when rendering the prompt or calling the model fails;
    /// malformed completions resolve to the kind's fallback value.
    #[instrument(skip_all, fields(agent = self.config.kind.name(), task_len = task.len()))]
    pub fn execute(&self, task: &str) -> Result<AgentOutput> {
        let started = Instant::now();
        let kind = &self.config.kind;

        let fields = match kind {
            AgentKind::AskUser { heuristic } => {
                if heuristic.trim().is_empty() {
                    debug!("no ask-user heuristic configured, skipping model call");
                    return Ok(AgentOutput::Text(String::new()));
                }
                ask_user::fields(task, heuristic.trim())
            }
            AgentKind::Goal => goal::fields(),
            AgentKind::ContextValidator { context } => context_validator::fields(context, task),
            AgentKind::Synthesizer { context } => synthesizer::fields(context, task),
            AgentKind::OodaPlanner => ooda_planner::fields(),
        };

        let system = self
            .prompts
            .render(kind.template(), &fields)
            .with_context(|| format!("render {} prompt", kind.name()))?;
        let mut messages = self.conversation.clone();
        messages.push(Message::system(system));

        let completion = self
            .lm
            .call(&messages, ResponseFormat::JsonObject)
            .with_context(|| format!("{} agent model call", kind.name()))?;
        debug!(completion = %completion, "raw completion");

        let output = match kind {
            AgentKind::AskUser { .. } => AgentOutput::Text(ask_user::decode(&completion)),
            AgentKind::Goal => AgentOutput::Text(goal::decode(
                &completion,
                self.newest.as_deref().unwrap_or_default(),
            )),
            AgentKind::ContextValidator { .. } => {
                AgentOutput::Structured(context_validator::decode(&completion))
            }
            AgentKind::Synthesizer { .. } => {
                AgentOutput::Structured(synthesizer::decode(&completion))
            }
            AgentKind::OodaPlanner => AgentOutput::Structured(ooda_planner::decode(&completion)),
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "agent finished"
        );
        Ok(output)
    }
}

/// Fields shared by the kinds that reason over a context blob.
fn context_query_fields(context: &str, query: &str) -> Fields {
    Fields::from([
        ("context", context.to_string()),
        ("query", query.to_string()),
    ])
}

/// Decode an arbitrary JSON mapping, falling back to an empty one.
fn decode_mapping(completion: &str) -> Map<String, Value> {
    parse_or(completion, Map::new())
}
