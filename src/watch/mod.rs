// src/watch/mod.rs

//! File watching, rule classification, and restart debouncing.
//!
//! This module is responsible for:
//! - Compiling include / exclude regex rules and classifying changed paths
//!   against them.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Coalescing bursts of qualifying changes into a single delayed restart.
//!
//! It does **not** know how a restart actually happens; it only drives a
//! [`RestartTrigger`] collaborator.

pub mod debounce;
pub mod rules;
pub mod watcher;

pub use debounce::{DebouncedRestart, RestartTrigger};
pub use rules::{RuleMatch, RuleSet, check_if_would_be_excluded};
pub use watcher::{WatcherHandle, spawn_watcher};
