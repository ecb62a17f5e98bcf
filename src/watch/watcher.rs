// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::event::{CreateKind, EventKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::watch::debounce::DebouncedRestart;
use crate::watch::rules::RuleSet;

/// Handle for a running filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; [`shutdown`] drops it,
/// which releases the OS watch registration on every exit path.
///
/// [`shutdown`]: WatcherHandle::shutdown
pub struct WatcherHandle {
    inner: Option<RecommendedWatcher>,
    shutdown_tx: watch::Sender<bool>,
    loop_task: Option<JoinHandle<()>>,
    restart: Arc<DebouncedRestart>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("active", &self.inner.is_some())
            .finish()
    }
}

impl WatcherHandle {
    /// Stop watching: signal the event loop, cancel any pending debounce
    /// timer, and release the watch registration.
    ///
    /// Idempotent; later calls are no-ops. No restart trigger fires after
    /// this returns.
    pub async fn shutdown(&mut self) {
        if self.inner.take().is_none() {
            return;
        }

        let _ = self.shutdown_tx.send(true);
        self.restart.shutdown().await;

        if let Some(task) = self.loop_task.take() {
            let _ = task.await;
        }

        info!("file watcher stopped");
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and requests
/// a debounced restart for every created or modified path the rule set lets
/// through.
///
/// A failure to register the root (missing path, no permissions) is fatal
/// and returned here; the watcher never starts. Subdirectories created
/// later are picked up by the recursive watch as they appear, and a
/// transient failure to cover one is reported through the error callback
/// without stopping the loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    rules: RuleSet,
    restart: Arc<DebouncedRestart>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // A send error means the loop is gone; nothing to forward to.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                // notify runs this on its own thread; a backend error for a
                // single path (e.g. a subdirectory deleted mid-registration)
                // must not stop the watch.
                eprintln!("devwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching directory {:?}", root))?;

    info!("file watcher started on {:?}", root);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let loop_root = root.clone();
    let loop_restart = Arc::clone(&restart);

    let loop_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = shutdown_rx.changed() => break,
                event = event_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            debug!("received notify event: {:?}", event);
            handle_event(&loop_root, &rules, &loop_restart, event).await;
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle {
        inner: Some(watcher),
        shutdown_tx,
        loop_task: Some(loop_task),
        restart,
    })
}

/// Classify one raw event and request a restart when a path proceeds.
///
/// Only creation and modification are restart-worthy: deleted files need no
/// rebuild during development, and a new directory only extends watch
/// coverage.
async fn handle_event(root: &Path, rules: &RuleSet, restart: &DebouncedRestart, event: Event) {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => {
            debug!("new directory under watch: {:?}", event.paths);
            return;
        }
        EventKind::Create(_) | EventKind::Modify(_) => {}
        EventKind::Remove(_) => return,
        _ => return,
    }

    for path in &event.paths {
        // Some backends report directory creation as Create(Any); skip
        // directories regardless of the reported kind.
        if path.is_dir() {
            continue;
        }

        match relative_str(root, path) {
            Some(rel) => {
                let outcome = rules.match_rule(&rel);
                if outcome.proceed() {
                    debug!(
                        path = %rel,
                        pattern = %outcome.pattern(),
                        "change accepted -> requesting restart"
                    );
                    restart.request_restart().await;
                } else {
                    debug!(
                        path = %rel,
                        pattern = %outcome.pattern(),
                        "change excluded"
                    );
                }
            }
            None => {
                warn!(
                    "could not relativize path {:?} against root {:?}",
                    path, root
                );
            }
        }
    }
}

/// Path relative to `root`, keeping the platform separator, since that is
/// what the rule patterns are written against.
///
/// Returns `None` if the path is not under `root`.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().into_owned())
}
