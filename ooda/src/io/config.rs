//! Agent configuration stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::window::DEFAULT_WINDOW_SIZE;

/// Orchestration settings (TOML).
///
/// Missing fields take the defaults below, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OodaConfig {
    /// Number of recent conversation entries each agent sends to the model.
    pub window_size: usize,

    /// Heuristic gating the ask-user agent. Empty disables asking entirely.
    pub ask_user_heuristic: String,

    /// Directory holding `<template-id>.md` overrides for the built-in prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for OodaConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            ask_user_heuristic: String::new(),
            prompts_dir: None,
        }
    }
}

impl OodaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(anyhow!("window_size must be > 0"));
        }
        if let Some(dir) = &self.prompts_dir
            && dir.as_os_str().is_empty()
        {
            return Err(anyhow!("prompts_dir must not be empty when set"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `OodaConfig::default()`.
pub fn load_config(path: &Path) -> Result<OodaConfig> {
    if !path.exists() {
        let cfg = OodaConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: OodaConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &OodaConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
