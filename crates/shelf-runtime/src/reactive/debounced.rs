#![forbid(unsafe_code)]

//! Debounced value cell for bursty inputs such as search boxes.
//!
//! Writes are buffered: each [`DebouncedValueCell::set`] replaces the pending
//! value and restarts a single quiet-period timer. Only when the timer fires
//! does the pending value become readable and subscribers get notified.
//!
//! # Invariants
//!
//! - **Latest-wins**: of a burst of writes less than `delay` apart, only the
//!   last one is ever published; the others are discarded, never replayed.
//! - **One timer**: a cell owns at most one pending timer at any time.
//! - **Settled reads**: `get`/`with` return the last published value, never
//!   a pending one.
//! - **Exactly once**: each publication notifies every subscriber once.
//! - **Silent teardown**: dropping the cell cancels its pending timer; no
//!   publication happens afterwards.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shelf_core::Scheduler;
//! use shelf_runtime::DebouncedValueCell;
//!
//! let scheduler = Scheduler::manual();
//! let search = DebouncedValueCell::new(String::new(), Duration::from_millis(300), &scheduler);
//!
//! search.set("d".into());
//! scheduler.advance(Duration::from_millis(100));
//! search.set("du".into());
//! scheduler.advance(Duration::from_millis(100));
//! search.set("dune".into());
//! assert_eq!(search.get(), "");
//!
//! scheduler.advance(Duration::from_millis(300));
//! assert_eq!(search.get(), "dune");
//! assert_eq!(search.version(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use shelf_core::{Scheduler, ShelfConfig, TimerId};
use tracing::trace;

use super::observable::{Observable, Subscription};

struct PendingWrite<T> {
    value: T,
    timer: TimerId,
}

struct CellInner<T> {
    settled: Observable<T>,
    pending: RefCell<Option<PendingWrite<T>>>,
}

/// A reactive cell that publishes only the last write of each burst.
///
/// The cell is owned by the component that declared the input; dropping it
/// tears the cell down and discards any pending write.
pub struct DebouncedValueCell<T> {
    inner: Rc<CellInner<T>>,
    scheduler: Scheduler,
    delay: Duration,
}

impl<T: fmt::Debug> fmt::Debug for DebouncedValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedValueCell")
            .field("settled", &self.inner.settled)
            .field("pending", &self.inner.pending.borrow().is_some())
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T: Clone + 'static> DebouncedValueCell<T> {
    /// Create a cell holding `initial`, publishing writes `delay` after the last one.
    pub fn new(initial: T, delay: Duration, scheduler: &Scheduler) -> Self {
        Self {
            inner: Rc::new(CellInner {
                settled: Observable::new(initial),
                pending: RefCell::new(None),
            }),
            scheduler: scheduler.clone(),
            delay,
        }
    }

    /// Create a cell using the configured debounce delay.
    pub fn with_config(initial: T, config: &ShelfConfig, scheduler: &Scheduler) -> Self {
        Self::new(initial, config.debounce_delay, scheduler)
    }

    /// Buffer a write.
    ///
    /// Cancels the timer of any earlier unpublished write and starts a new
    /// one. The readable value is unchanged until that timer fires.
    pub fn set(&self, value: T) {
        let superseded = self.inner.pending.borrow_mut().take();
        if let Some(previous) = superseded {
            self.scheduler.cancel(previous.timer);
            trace!(timer = previous.timer.raw(), "debounced write superseded");
        }

        let weak = Rc::downgrade(&self.inner);
        let timer = self.scheduler.schedule(self.delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let write = inner.pending.borrow_mut().take();
            if let Some(write) = write {
                trace!(timer = write.timer.raw(), "debounced write settled");
                inner.settled.set(write.value);
            }
        });
        *self.inner.pending.borrow_mut() = Some(PendingWrite { value, timer });
    }

    /// Clone out the settled value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.settled.get()
    }

    /// Borrow the settled value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.settled.with(f)
    }

    /// Number of publications so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.settled.version()
    }

    /// Register a callback invoked once per publication with the new value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.settled.subscribe(callback)
    }
}

impl<T> DebouncedValueCell<T> {
    /// Whether a write is waiting for its quiet period to elapse.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// The quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Discard the pending write, if any, without publishing it.
    ///
    /// Returns `true` if a write was discarded.
    pub fn cancel_pending(&self) -> bool {
        let pending = self.inner.pending.borrow_mut().take();
        match pending {
            Some(write) => {
                self.scheduler.cancel(write.timer);
                trace!(timer = write.timer.raw(), "debounced write discarded");
                true
            }
            None => false,
        }
    }
}

impl<T> Drop for DebouncedValueCell<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
