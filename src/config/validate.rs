// src/config/validate.rs

use anyhow::{Context, Result, anyhow};

use crate::config::model::ConfigFile;
use crate::watch::rules::RuleSet;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[restart].cmd` is not empty or whitespace
/// - `[restart].delay_ms >= 1`
/// - every include/exclude pattern (with defaults applied) compiles
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_restart(cfg)?;
    validate_patterns(cfg)?;
    Ok(())
}

fn validate_restart(cfg: &ConfigFile) -> Result<()> {
    if cfg.restart.cmd.trim().is_empty() {
        return Err(anyhow!("[restart].cmd must not be empty"));
    }

    if cfg.restart.delay_ms == 0 {
        return Err(anyhow!("[restart].delay_ms must be >= 1 (got 0)"));
    }

    Ok(())
}

fn validate_patterns(cfg: &ConfigFile) -> Result<()> {
    // A malformed regex is caller misconfiguration; reject it up front
    // instead of letting it surface mid-watch.
    RuleSet::new(&cfg.watch.include, &cfg.watch.effective_excludes())
        .context("invalid [watch] patterns")?;
    Ok(())
}
