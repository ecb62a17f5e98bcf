// src/lib.rs

pub mod cli;
pub mod config;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::exec::spawn_supervisor;
use crate::watch::{DebouncedRestart, RuleSet, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the process supervisor (the concrete restart trigger)
/// - the debounced restart in front of it
/// - the file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = watch_root(&config_path, &cfg, args.dir.as_deref());
    let includes = effective_includes(&cfg, &args);
    let excludes = effective_excludes(&cfg, &args);

    if args.dry_run {
        print_dry_run(&cfg, &root, &includes, &excludes);
        return Ok(());
    }

    // CLI-supplied patterns haven't been through config validation, so
    // compilation can still fail here.
    let rules = RuleSet::new(&includes, &excludes)?;

    let (trigger, mut supervisor) = spawn_supervisor(cfg.restart.cmd.clone());

    let restart = Arc::new(DebouncedRestart::new(
        trigger,
        Duration::from_millis(cfg.restart.delay_ms),
    ));

    let mut watcher = spawn_watcher(&root, rules, Arc::clone(&restart))?;

    info!("watching {:?}; press Ctrl-C to stop", root);
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested, stopping");

    watcher.shutdown().await;
    supervisor.shutdown().await;

    Ok(())
}

/// Resolve the directory to watch.
///
/// `[watch].dir` is taken relative to the config file's directory (or `.`
/// when the config path has no parent); an absolute `--dir` override wins
/// outright.
fn watch_root(config_path: &Path, cfg: &ConfigFile, dir_override: Option<&str>) -> PathBuf {
    let base = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let dir = dir_override.unwrap_or(&cfg.watch.dir);
    base.join(dir)
}

fn effective_includes(cfg: &ConfigFile, args: &CliArgs) -> Vec<String> {
    let mut patterns = cfg.watch.include.clone();
    patterns.extend(args.include.iter().cloned());
    patterns
}

fn effective_excludes(cfg: &ConfigFile, args: &CliArgs) -> Vec<String> {
    let mut patterns = if args.no_default_excludes {
        cfg.watch.exclude.clone()
    } else {
        cfg.watch.effective_excludes()
    };
    patterns.extend(args.exclude.iter().cloned());
    patterns
}

/// Simple dry-run output: print the effective watch setup.
fn print_dry_run(cfg: &ConfigFile, root: &Path, includes: &[String], excludes: &[String]) {
    println!("devwatch dry-run");
    println!("  restart.cmd = {}", cfg.restart.cmd);
    println!("  restart.delay_ms = {}", cfg.restart.delay_ms);
    println!("  watch root = {:?}", root);
    println!();

    println!("include patterns ({}):", includes.len());
    for pattern in includes {
        println!("  - {pattern}");
    }

    println!("exclude patterns ({}):", excludes.len());
    for pattern in excludes {
        println!("  - {pattern}");
    }
}
