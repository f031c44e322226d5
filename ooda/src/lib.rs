//! Reasoning core for an OODA (observe, orient, decide, act) agent loop.
//!
//! The crate turns one reasoning step into one language-model round-trip and
//! keeps the result usable even when the model ignores the requested format.
//! The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (message types, conversation
//!   windowing, decode-with-default, keyed caching). No I/O.
//! - **[`io`]**: Boundaries to the outside world (the [`LanguageModel`]
//!   capability, prompt templates, configuration, knowledge injection).
//!
//! [`agents`] and [`program_space`] compose the two: task agents perform a
//! single reasoning step, and the program space reuses previously solved plans
//! by letting the model match a new problem against stored descriptions.
//!
//! [`LanguageModel`]: io::lm::LanguageModel

pub mod agents;
pub mod core;
pub mod io;
pub mod logging;
pub mod program_space;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
