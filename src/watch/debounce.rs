// src/watch/debounce.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// External collaborator that actually performs a restart.
///
/// Implementations must not block: the debounce timer task calls
/// [`trigger`](RestartTrigger::trigger) directly, so anything slow (killing
/// and respawning a process, say) belongs behind a channel.
pub trait RestartTrigger: Send + Sync {
    fn trigger(&self);
}

/// Coalesces bursts of restart requests into a single delayed
/// [`RestartTrigger::trigger`] call.
///
/// Editors often perform several write operations for one logical save, so
/// each request replaces the pending timer and the trigger only fires after
/// a quiet period with no further qualifying events. At most one pending
/// timer exists at a time. A timer that is already past its sleep may still
/// fire concurrently with a new request; that narrow race produces at most
/// one extra trigger call per burst.
pub struct DebouncedRestart {
    trigger: Arc<dyn RestartTrigger>,
    delay: Duration,
    /// The single pending-timer slot; replaced (and the old timer aborted)
    /// on every request.
    pending: Mutex<Option<JoinHandle<()>>>,
    stopped: Arc<AtomicBool>,
}

impl DebouncedRestart {
    pub fn new(trigger: Arc<dyn RestartTrigger>, delay: Duration) -> Self {
        Self {
            trigger,
            delay,
            pending: Mutex::new(None),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// (Re)schedule the delayed trigger invocation, cancelling a previously
    /// pending one.
    pub async fn request_restart(&self) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }

        let trigger = Arc::clone(&self.trigger);
        let stopped = Arc::clone(&self.stopped);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if !stopped.load(Ordering::SeqCst) {
                debug!("quiet period elapsed, firing restart trigger");
                trigger.trigger();
            }
        });

        let previous = self.pending.lock().await.replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancel any pending timer and refuse further requests.
    ///
    /// Idempotent; no trigger fires once this has run.
    pub async fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(pending) = self.pending.lock().await.take() {
            pending.abort();
        }
        debug!("debounced restart shut down");
    }
}

impl std::fmt::Debug for DebouncedRestart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedRestart")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
