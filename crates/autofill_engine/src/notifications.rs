//! Transient user notifications ("toasts").
//!
//! The queue keeps entries in insertion order and removes each one after its
//! duration. Observers get the whole list on every change. Expiry timers run
//! on the ambient Tokio runtime and hold only a weak reference to the queue,
//! so dropping the last handle stops them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use autofill_core::{Severity, DEFAULT_NOTIFICATION_DURATION};
use autofill_logging::{autofill_debug, autofill_warn};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

const UPDATE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub duration: Duration,
}

#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    entries: Mutex<Vec<Notification>>,
    updates: broadcast::Sender<Vec<Notification>>,
    next_id: AtomicU64,
    default_duration: Duration,
    expiry: CancellationToken,
}

impl Drop for QueueInner {
    fn drop(&mut self) {
        self.expiry.cancel();
    }
}

impl QueueInner {
    // A poisoned lock still holds a consistent Vec; keep serving it.
    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` and publishes the new list when it reports a mutation.
    /// Publishing happens under the lock so observers see mutations in order.
    fn mutate(&self, change: impl FnOnce(&mut Vec<Notification>) -> bool) -> bool {
        let mut entries = self.lock();
        if !change(&mut entries) {
            return false;
        }
        // No receivers is fine; the list is still readable via `snapshot`.
        let _ = self.updates.send(entries.clone());
        true
    }

    fn remove(&self, id: NotificationId) -> bool {
        self.mutate(|entries| {
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        })
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_NOTIFICATION_DURATION)
    }

    pub fn with_default_duration(default_duration: Duration) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            inner: Arc::new(QueueInner {
                entries: Mutex::new(Vec::new()),
                updates,
                next_id: AtomicU64::new(1),
                default_duration,
                expiry: CancellationToken::new(),
            }),
        }
    }

    /// Appends a notification and schedules its removal after `duration`
    /// (the queue default when `None` or zero).
    pub fn enqueue(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) -> NotificationId {
        let duration = duration
            .filter(|d| !d.is_zero())
            .unwrap_or(self.inner.default_duration);
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
            duration,
        };
        autofill_debug!(
            "Notification {:?} [{}] for {:?}: {}",
            id,
            severity.as_str(),
            duration,
            notification.message
        );
        self.inner.mutate(|entries| {
            entries.push(notification);
            true
        });
        self.schedule_expiry(id, duration);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, Severity::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, Severity::Error, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, Severity::Warning, None)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, Severity::Info, None)
    }

    /// Removes the notification if it is still queued. Returns `false` when it
    /// was already gone (expired or dismissed).
    pub fn remove(&self, id: NotificationId) -> bool {
        self.inner.remove(id)
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.lock().clone()
    }

    /// Stream of the full list: the current one first, then one per change.
    pub fn observe(&self) -> NotificationStream {
        // Subscribe while holding the lock so no change slips between the
        // initial snapshot and the first broadcast.
        let entries = self.inner.lock();
        let updates = self.inner.updates.subscribe();
        NotificationStream {
            initial: Some(entries.clone()),
            updates,
            queue: self.clone(),
        }
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            autofill_warn!("No Tokio runtime; notification {:?} will not expire", id);
            return;
        };
        let queue: Weak<QueueInner> = Arc::downgrade(&self.inner);
        let cancelled = self.inner.expiry.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    if let Some(queue) = queue.upgrade() {
                        if queue.remove(id) {
                            autofill_debug!("Notification {:?} expired", id);
                        }
                    }
                }
            }
        });
    }
}

/// Push-based view of a [`NotificationQueue`]. It never ends while the
/// stream is alive, since it keeps the queue alive itself.
pub struct NotificationStream {
    initial: Option<Vec<Notification>>,
    updates: broadcast::Receiver<Vec<Notification>>,
    queue: NotificationQueue,
}

impl NotificationStream {
    pub async fn next(&mut self) -> Option<Vec<Notification>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        match self.updates.recv().await {
            Ok(list) => Some(list),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Intermediate lists are gone; the latest one is what matters.
                autofill_debug!("Notification observer skipped {} updates", skipped);
                self.updates = self.updates.resubscribe();
                Some(self.queue.snapshot())
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
