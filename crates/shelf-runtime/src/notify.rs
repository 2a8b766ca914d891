#![forbid(unsafe_code)]

//! Self-expiring notification queue.
//!
//! Backs the success/error banners of the catalogue UI. Every message added
//! to a [`NotificationQueue`] is visible immediately and evicts itself once
//! its display duration elapses. The user may dismiss a message earlier with
//! [`NotificationQueue::remove`]; the eviction timer is left running and
//! later finds nothing to remove.
//!
//! Ids come from one process-wide counter, so they are unique and strictly
//! increasing across every queue in the process.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shelf_core::Scheduler;
//! use shelf_runtime::{NotificationKind, NotificationQueue};
//!
//! let scheduler = Scheduler::manual();
//! let queue = NotificationQueue::new(&scheduler);
//!
//! let id = queue.add(NotificationKind::Error, "Save failed", Duration::from_millis(100));
//! assert!(queue.contains(id));
//!
//! scheduler.advance(Duration::from_millis(100));
//! assert!(queue.is_empty());
//! assert!(!queue.remove(id));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use shelf_core::config::DEFAULT_TOAST_DURATION;
use shelf_core::{Scheduler, ShelfConfig};
use tracing::{debug, trace};

use crate::reactive::{Observable, Subscription};

static NEXT_NOTIFICATION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    fn next() -> Self {
        Self(NEXT_NOTIFICATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// Lowercase name, as used by the banner layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One live message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Process-wide unique id, used to dismiss the message.
    pub id: NotificationId,
    /// Success or error styling.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Text shown in the banner.
    pub text: String,
    /// How long the message stays before evicting itself.
    #[serde(skip)]
    pub duration: Duration,
}

/// Ordered list of live notifications with timed auto-eviction.
///
/// Cloning yields another handle on the same list, so any component holding
/// a handle sees the same messages.
#[derive(Clone)]
pub struct NotificationQueue {
    live: Observable<Vec<Notification>>,
    scheduler: Scheduler,
    default_duration: Duration,
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("live", &self.len())
            .field("default_duration", &self.default_duration)
            .finish()
    }
}

impl NotificationQueue {
    /// Create an empty queue whose messages last 3 seconds unless told otherwise.
    pub fn new(scheduler: &Scheduler) -> Self {
        Self {
            live: Observable::new(Vec::new()),
            scheduler: scheduler.clone(),
            default_duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Create an empty queue using the configured toast duration.
    pub fn with_config(config: &ShelfConfig, scheduler: &Scheduler) -> Self {
        Self::new(scheduler).with_default_duration(config.toast_duration)
    }

    /// Override the duration used by [`success`](Self::success) and [`error`](Self::error).
    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// The duration used when none is given.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Append a message and schedule its eviction.
    ///
    /// The message is visible as soon as this returns. A zero duration
    /// evicts on the next scheduler turn.
    pub fn add(
        &self,
        kind: NotificationKind,
        text: impl Into<String>,
        duration: Duration,
    ) -> NotificationId {
        let id = NotificationId::next();
        let text = text.into();
        debug!(
            id = id.raw(),
            kind = kind.as_str(),
            duration_ms = duration.as_millis() as u64,
            "notification added"
        );

        self.live.update(|list| {
            list.push(Notification {
                id,
                kind,
                text,
                duration,
            });
        });

        let queue = self.live.downgrade();
        self.scheduler.schedule(duration, move || {
            if let Some(live) = queue.upgrade() {
                if remove_from(&live, id) {
                    trace!(id = id.raw(), "notification expired");
                }
            }
        });
        id
    }

    /// Add a success message with the default duration.
    pub fn success(&self, text: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Success, text, self.default_duration)
    }

    /// Add an error message with the default duration.
    pub fn error(&self, text: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Error, text, self.default_duration)
    }

    /// Add a success message that lasts `duration`.
    pub fn success_for(&self, text: impl Into<String>, duration: Duration) -> NotificationId {
        self.add(NotificationKind::Success, text, duration)
    }

    /// Add an error message that lasts `duration`.
    pub fn error_for(&self, text: impl Into<String>, duration: Duration) -> NotificationId {
        self.add(NotificationKind::Error, text, duration)
    }

    /// Remove a message if it is still live.
    ///
    /// Idempotent: returns `false` when the id is unknown or already gone.
    pub fn remove(&self, id: NotificationId) -> bool {
        let removed = remove_from(&self.live, id);
        if removed {
            debug!(id = id.raw(), "notification dismissed");
        }
        removed
    }

    /// Snapshot of the live messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> Vec<Notification> {
        self.live.get()
    }

    /// Borrow the live messages for the duration of `f`.
    pub fn with_messages<R>(&self, f: impl FnOnce(&[Notification]) -> R) -> R {
        self.live.with(|list| f(list))
    }

    /// Clone out one live message.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.live
            .with(|list| list.iter().find(|n| n.id == id).cloned())
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.live.with(|list| list.iter().any(|n| n.id == id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.with(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a callback invoked with the full list after every change.
    pub fn subscribe(&self, callback: impl Fn(&[Notification]) + 'static) -> Subscription {
        self.live.subscribe(move |list: &Vec<Notification>| callback(list))
    }
}

/// Remove `id` from the list, notifying observers only if it was present.
fn remove_from(live: &Observable<Vec<Notification>>, id: NotificationId) -> bool {
    if !live.with(|list| list.iter().any(|n| n.id == id)) {
        return false;
    }
    live.update(|list| list.retain(|n| n.id != id));
    true
}
