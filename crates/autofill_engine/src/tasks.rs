use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

/// Group of background tasks that are cancelled together: the orchestrator
/// actor, pending fill/settle timers and in-flight lookups.
#[derive(Debug)]
pub(crate) struct TaskArena {
    cancel: CancellationToken,
    live: Arc<AtomicUsize>,
}

impl TaskArena {
    pub(crate) fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs `task` until it completes or the arena is cancelled, whichever
    /// comes first. Does nothing once the arena is cancelled.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return;
        }
        let cancel = self.cancel.clone();
        let live = LiveGuard::enter(&self.live);
        tokio::spawn(async move {
            let _live = live;
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = task => {}
            }
        });
    }

    pub(crate) fn cancel_all(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Tasks spawned and not yet finished or cancelled.
    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

impl Drop for TaskArena {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter.clone())
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Aborts a detached task when dropped.
pub(crate) struct AbortOnDrop(pub(crate) AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
