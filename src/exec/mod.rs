// src/exec/mod.rs

//! Process supervision for the development command.
//!
//! This module owns the child process that `devwatch` keeps restarting,
//! using `tokio::process::Command`. The watcher side never touches the
//! process directly; it fires a [`RestartTrigger`] and the supervisor loop
//! does the kill/respawn.
//!
//! [`RestartTrigger`]: crate::watch::RestartTrigger

pub mod supervisor;

pub use supervisor::{ProcessRestartTrigger, SupervisorHandle, spawn_supervisor};
