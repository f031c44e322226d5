//! Prompt rendering for agent and program-search templates.
//!
//! Templates are minijinja sources keyed by [`TemplateId`]. Built-in versions
//! are compiled into the crate; a directory of `<template-id>.md` files can
//! replace any of them at runtime without recompiling.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use minijinja::Environment;
use tracing::debug;

use crate::io::config::OodaConfig;

const ASK_USER_TEMPLATE: &str = include_str!("prompts/ask_user.md");
const PROBLEM_STATEMENT_TEMPLATE: &str = include_str!("prompts/problem_statement.md");
const CONTENT_VALIDATION_TEMPLATE: &str = include_str!("prompts/content_validation.md");
const SYNTHESIZE_RESULT_TEMPLATE: &str = include_str!("prompts/synthesize_result.md");
const OODA_PLAN_TEMPLATE: &str = include_str!("prompts/ooda_plan.md");
const PROGRAM_SEARCH_TEMPLATE: &str = include_str!("prompts/program_search.md");
const KNOWLEDGE_INJECTION_TEMPLATE: &str = include_str!("prompts/knowledge_injection.md");

/// Named template fields. Values are inserted verbatim.
pub type Fields = BTreeMap<&'static str, String>;

/// Identifier of a prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    AskUser,
    DeriveProblemStatement,
    ContentValidation,
    SynthesizeResult,
    GenerateOodaPlan,
    ProgramSearch,
    KnowledgeInjection,
}

impl TemplateId {
    pub const ALL: [TemplateId; 7] = [
        TemplateId::AskUser,
        TemplateId::DeriveProblemStatement,
        TemplateId::ContentValidation,
        TemplateId::SynthesizeResult,
        TemplateId::GenerateOodaPlan,
        TemplateId::ProgramSearch,
        TemplateId::KnowledgeInjection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::AskUser => "ask-user",
            TemplateId::DeriveProblemStatement => "derive-problem-statement",
            TemplateId::ContentValidation => "content-validation",
            TemplateId::SynthesizeResult => "synthesize-result",
            TemplateId::GenerateOodaPlan => "generate-ooda-plan",
            TemplateId::ProgramSearch => "program-search",
            TemplateId::KnowledgeInjection => "knowledge-injection",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            TemplateId::AskUser => ASK_USER_TEMPLATE,
            TemplateId::DeriveProblemStatement => PROBLEM_STATEMENT_TEMPLATE,
            TemplateId::ContentValidation => CONTENT_VALIDATION_TEMPLATE,
            TemplateId::SynthesizeResult => SYNTHESIZE_RESULT_TEMPLATE,
            TemplateId::GenerateOodaPlan => OODA_PLAN_TEMPLATE,
            TemplateId::ProgramSearch => PROGRAM_SEARCH_TEMPLATE,
            TemplateId::KnowledgeInjection => KNOWLEDGE_INJECTION_TEMPLATE,
        }
    }
}

/// Template engine wrapper around minijinja holding every known template.
#[derive(Clone)]
pub struct PromptBook {
    env: Environment<'static>,
}

impl Default for PromptBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBook {
    /// Book with the built-in templates only.
    pub fn new() -> Self {
        let mut env = Environment::new();
        for id in TemplateId::ALL {
            env.add_template(id.as_str(), id.builtin())
                .expect("built-in template should be valid");
        }
        Self { env }
    }

    /// Book whose templates are replaced by `<template-id>.md` files found in
    /// `dir`. Templates without an override file keep their built-in source.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut book = Self::new();
        for id in TemplateId::ALL {
            let path = dir.join(format!("{}.md", id.as_str()));
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path)
                .with_context(|| format!("read prompt template {}", path.display()))?;
            book.env
                .add_template_owned(id.as_str(), source)
                .with_context(|| format!("parse prompt template {}", path.display()))?;
            debug!(template = id.as_str(), path = %path.display(), "loaded template override");
        }
        Ok(book)
    }

    /// Book for a loaded configuration (honours `prompts_dir`).
    pub fn from_config(cfg: &OodaConfig) -> Result<Self> {
        match &cfg.prompts_dir {
            Some(dir) => Self::with_overrides(dir),
            None => Ok(Self::new()),
        }
    }

    /// Render template `id` with `fields`.
    pub fn render(&self, id: TemplateId, fields: &Fields) -> Result<String> {
        let template = self.env.get_template(id.as_str())?;
        let rendered = template
            .render(fields)
            .with_context(|| format!("render template {}", id.as_str()))?;
        Ok(rendered)
    }
}
