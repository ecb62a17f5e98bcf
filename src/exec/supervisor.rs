// src/exec/supervisor.rs

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::watch::debounce::RestartTrigger;

/// Commands accepted by the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupervisorCommand {
    Restart,
    Shutdown,
}

/// `RestartTrigger` that asks the supervisor loop to bounce the process.
///
/// `trigger` only enqueues; the kill/respawn happens on the supervisor
/// task, so the debounce timer is never blocked.
pub struct ProcessRestartTrigger {
    tx: mpsc::UnboundedSender<SupervisorCommand>,
}

impl RestartTrigger for ProcessRestartTrigger {
    fn trigger(&self) {
        if self.tx.send(SupervisorCommand::Restart).is_err() {
            warn!("supervisor loop is gone; restart request dropped");
        }
    }
}

/// Handle for stopping the supervisor and its child process.
pub struct SupervisorHandle {
    tx: mpsc::UnboundedSender<SupervisorCommand>,
    task: Option<JoinHandle<()>>,
}

impl SupervisorHandle {
    /// Kill the development command and end the supervisor loop.
    ///
    /// Idempotent; later calls are no-ops.
    pub async fn shutdown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let _ = self.tx.send(SupervisorCommand::Shutdown);
        let _ = task.await;
    }
}

/// Spawn the supervisor loop for the given development command.
///
/// The loop starts the command immediately and restarts it whenever a
/// trigger arrives. Returns the trigger to hand to the debouncer and a
/// handle for shutdown.
pub fn spawn_supervisor(cmd: String) -> (Arc<ProcessRestartTrigger>, SupervisorHandle) {
    let (tx, rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(supervisor_loop(cmd, rx));

    (
        Arc::new(ProcessRestartTrigger { tx: tx.clone() }),
        SupervisorHandle {
            tx,
            task: Some(task),
        },
    )
}

async fn supervisor_loop(cmd: String, mut rx: mpsc::UnboundedReceiver<SupervisorCommand>) {
    let mut child = match start_process(&cmd) {
        Ok(child) => Some(child),
        Err(err) => {
            // The next trigger will retry; a broken command line stays
            // visible in the log on every attempt.
            error!(error = %err, "failed to start development command");
            None
        }
    };

    while let Some(command) = rx.recv().await {
        match command {
            SupervisorCommand::Restart => {
                stop_process(&mut child).await;
                info!(cmd = %cmd, "restarting development command");
                match start_process(&cmd) {
                    Ok(new_child) => child = Some(new_child),
                    Err(err) => {
                        error!(error = %err, "failed to restart development command");
                        child = None;
                    }
                }
            }
            SupervisorCommand::Shutdown => {
                stop_process(&mut child).await;
                break;
            }
        }
    }

    debug!("supervisor loop ended");
}

fn start_process(cmd: &str) -> Result<Child> {
    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning development command '{cmd}'"))?;

    forward_output(&mut child);

    info!(cmd = %cmd, "development command started");
    Ok(child)
}

/// Stream the child's stdout/stderr lines into the log so its output stays
/// visible across restarts. Also keeps OS pipe buffers from filling.
fn forward_output(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!("app: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("app: {}", line);
            }
        });
    }
}

/// Kill the current child if it is still running and reap it.
async fn stop_process(child: &mut Option<Child>) {
    let Some(mut running) = child.take() else {
        return;
    };

    match running.try_wait() {
        Ok(Some(status)) => {
            debug!(code = ?status.code(), "development command had already exited");
            return;
        }
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "could not query development command state");
        }
    }

    if let Err(err) = running.kill().await {
        warn!(error = %err, "failed to kill development command");
        return;
    }

    match running.wait().await {
        Ok(status) => debug!(code = ?status.code(), "development command stopped"),
        Err(err) => warn!(error = %err, "failed to reap development command"),
    }
}
