//! Boundaries to the outside world: the language model, prompt templates,
//! configuration files and knowledge injection.

pub mod config;
pub mod knowledge;
pub mod lm;
pub mod prompt;
