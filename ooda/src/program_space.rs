//! Registry of previously solved plans, searchable by problem description.
//!
//! The model alone picks a plan: registered descriptions are handed over as
//! JSON in registration order and the completion must be either a registered
//! name, verbatim, or start with [`NO_MATCH_SENTINEL`].

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::core::types::Message;
use crate::io::knowledge::knowledge_history;
use crate::io::lm::{LanguageModel, ResponseFormat};
use crate::io::prompt::{Fields, PromptBook, TemplateId};

/// Completion prefix meaning "no registered program fits".
pub const NO_MATCH_SENTINEL: &str = "NONE";

/// Something the caller has available to solve a problem (a document, a
/// dataset), described to the model by its overview.
pub trait Resource {
    fn unique_name(&self) -> &str;
    fn overview(&self) -> String;
}

/// Name-keyed store of programs and their descriptions.
///
/// Both maps always hold the same names. Upserts keep a name's original
/// position, so iteration order is first-registration order.
pub struct ProgramSpace<P, L> {
    descriptions: IndexMap<String, String>,
    programs: IndexMap<String, P>,
    lm: L,
    prompts: PromptBook,
}

impl<P, L: LanguageModel> ProgramSpace<P, L> {
    pub fn new(lm: L, prompts: PromptBook) -> Self {
        Self {
            descriptions: IndexMap::new(),
            programs: IndexMap::new(),
            lm,
            prompts,
        }
    }

    /// Register `program` under `name`, replacing any previous entry.
    pub fn add_or_update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        program: P,
    ) {
        let name = name.into();
        if name.starts_with(NO_MATCH_SENTINEL) {
            warn!(name = %name, "program name starts with the no-match sentinel and cannot be selected");
        }
        let replaced = self
            .descriptions
            .insert(name.clone(), description.into())
            .is_some();
        self.programs.insert(name.clone(), program);
        debug!(name = %name, replaced, "registered program");
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    pub fn program(&self, name: &str) -> Option<&P> {
        self.programs.get(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Ask the model for a registered program that solves `problem`.
    ///
    /// `knowledge` is injected as history ahead of the search prompt when
    /// non-empty; `resources` are summarised by unique name. Returns `None`
    /// when the model answers with the sentinel, and also when it names a
    /// program that is not registered.
    #[instrument(skip_all, fields(problem_len = problem.len(), programs = self.len()))]
    pub fn find_program(
        &self,
        problem: &str,
        knowledge: &[String],
        resources: &[&dyn Resource],
    ) -> Result<Option<&P>> {
        let started = Instant::now();
        let mut messages = knowledge_history(&self.prompts, knowledge)
            .context("render knowledge history")?;

        let overviews: BTreeMap<&str, String> = resources
            .iter()
            .map(|r| (r.unique_name(), r.overview()))
            .collect();
        let fields = Fields::from([
            ("problem", problem.to_string()),
            (
                "resource_overviews",
                serde_json::to_string(&overviews).context("serialize resource overviews")?,
            ),
            (
                "program_descriptions",
                serde_json::to_string(&self.descriptions)
                    .context("serialize program descriptions")?,
            ),
        ]);
        let prompt = self
            .prompts
            .render(TemplateId::ProgramSearch, &fields)
            .context("render program search prompt")?;
        messages.push(Message::user(prompt));

        let selected = self
            .lm
            .call(&messages, ResponseFormat::Text)
            .context("program search model call")?;
        debug!(
            selected = %selected,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "program search completed"
        );

        if selected.starts_with(NO_MATCH_SENTINEL) {
            return Ok(None);
        }
        let program = self.programs.get(selected.as_str());
        if program.is_none() {
            warn!(selected = %selected, "model named an unregistered program, treating as no match");
        }
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Role;
    use crate::test_support::{FailingLm, ScriptedLm};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Plan(&'static str);

    struct Filing {
        name: &'static str,
        overview: &'static str,
    }

    impl Resource for Filing {
        fn unique_name(&self) -> &str {
            self.name
        }

        fn overview(&self) -> String {
            self.overview.to_string()
        }
    }

    fn space(responses: &[&str]) -> ProgramSpace<Plan, ScriptedLm> {
        let mut space = ProgramSpace::new(
            ScriptedLm::new(responses.iter().copied()),
            PromptBook::new(),
        );
        space.add_or_update("cash-flow-plan", "computes free cash flow", Plan("P1"));
        space
    }

    fn keys_in_sync<P, L: LanguageModel>(space: &ProgramSpace<P, L>) -> bool {
        space.descriptions.keys().eq(space.programs.keys())
    }

    #[test]
    fn returns_the_named_program() {
        let space = space(&["cash-flow-plan"]);
        let got = space
            .find_program("What is the free cash flow?", &[], &[])
            .expect("search");
        assert_eq!(got, Some(&Plan("P1")));
    }

    #[test]
    fn sentinel_prefix_means_no_match() {
        for reply in ["NONE", "NONE - no suitable program", "NONE\ncash-flow-plan"] {
            let space = space(&[reply]);
            let got = space
                .find_program("What is the free cash flow?", &[], &[])
                .expect("search");
            assert_eq!(got, None, "reply {reply:?}");
        }
    }

    #[test]
    fn sentinel_must_be_a_prefix() {
        let mut space = space(&["cash-flow-plan NONE", " NONE"]);
        space.add_or_update("cash-flow-plan NONE", "odd name", Plan("P2"));
        assert_eq!(
            space.find_program("p", &[], &[]).expect("search"),
            Some(&Plan("P2"))
        );
        // Not a prefix and not registered either.
        assert_eq!(space.find_program("p", &[], &[]).expect("search"), None);
    }

    #[test]
    fn unregistered_name_is_no_match() {
        for reply in ["revenue-plan", "Cash-Flow-Plan", "cash-flow-plan\n"] {
            let space = space(&[reply]);
            assert_eq!(space.find_program("p", &[], &[]).expect("search"), None);
        }
    }

    #[test]
    fn upsert_is_last_write_wins_and_keeps_keys_in_sync() {
        let mut space = space(&[]);
        space.add_or_update("revenue-plan", "sums revenue", Plan("R1"));
        space.add_or_update("cash-flow-plan", "computes FCF from 10-K", Plan("P9"));

        assert_eq!(space.len(), 2);
        assert_eq!(space.description("cash-flow-plan"), Some("computes FCF from 10-K"));
        assert_eq!(space.program("cash-flow-plan"), Some(&Plan("P9")));
        assert_eq!(
            space.names().collect::<Vec<_>>(),
            vec!["cash-flow-plan", "revenue-plan"]
        );
        assert!(keys_in_sync(&space));
    }

    #[test]
    fn prompt_lists_descriptions_and_resources() {
        let mut space = space(&["NONE"]);
        space.add_or_update("revenue-plan", "sums revenue", Plan("R1"));
        let filing = Filing {
            name: "3M_2022_10K",
            overview: "3M annual report for FY2022",
        };

        space
            .find_program("What is the free cash flow?", &[], &[&filing])
            .expect("search");

        let call = &space.lm.calls()[0];
        assert_eq!(call.format, ResponseFormat::Text);
        assert_eq!(call.messages.len(), 1);
        assert_eq!(call.messages[0].role, Role::User);
        let prompt = &call.messages[0].content;
        assert!(prompt.contains("What is the free cash flow?"));
        assert!(prompt.contains(
            r#"{"cash-flow-plan":"computes free cash flow","revenue-plan":"sums revenue"}"#
        ));
        assert!(prompt.contains(r#"{"3M_2022_10K":"3M annual report for FY2022"}"#));
    }

    #[test]
    fn no_resources_render_as_empty_mapping() {
        let space = space(&["NONE"]);
        space.find_program("p", &[], &[]).expect("search");
        let prompt = &space.lm.calls()[0].messages[0].content;
        assert!(prompt.contains("keyed by unique name:\n{}\n"));
    }

    #[test]
    fn knowledge_is_injected_before_the_prompt() {
        let space = space(&["cash-flow-plan"]);
        let knowledge = vec!["FCF = operating cash flow - capex".to_string()];
        space.find_program("p", &knowledge, &[]).expect("search");

        let messages = &space.lm.calls()[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("FCF = operating cash flow - capex"));
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn model_failure_propagates() {
        let space: ProgramSpace<Plan, _> = ProgramSpace::new(FailingLm, PromptBook::new());
        let err = space.find_program("p", &[], &[]).unwrap_err();
        assert!(format!("{err:#}").contains("LM unavailable"));
    }
}
