#![forbid(unsafe_code)]

//! Cooperative, single-threaded timer scheduling.
//!
//! Every delayed effect in shelf (debounce settles, notification evictions)
//! is a callback registered on a [`Scheduler`]. Nothing blocks and nothing
//! runs in parallel: the host drives the scheduler forward and due callbacks
//! run to completion one at a time on the driving thread.
//!
//! # Clocks
//!
//! - [`Scheduler::manual`]: virtual time starting at zero. Time moves only
//!   through [`Scheduler::advance`] / [`Scheduler::advance_to`], which makes
//!   timing behavior fully deterministic in tests.
//! - [`Scheduler::monotonic`]: anchored at a monotonic instant. The host
//!   event loop calls [`Scheduler::poll`] and can sleep for
//!   [`Scheduler::time_until_next`] between polls.
//!
//! # Invariants
//!
//! 1. A timer fires at most once.
//! 2. Cancelling a pending timer guarantees its callback never runs;
//!    cancelling a fired or unknown timer is a no-op returning `false`.
//! 3. Timers fire in deadline order; equal deadlines fire in scheduling order.
//! 4. `now()` equals the firing timer's deadline while its callback runs,
//!    on either clock: catching up with real time never moves `now` past
//!    an unfired deadline.
//! 5. Callbacks never run inside [`Scheduler::schedule`], even for a zero
//!    delay.
//!
//! Callbacks may re-enter the scheduler (schedule or cancel other timers).
//! No borrow of the timer table is held while a callback runs or while a
//! cancelled callback is dropped.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;
use web_time::Instant;

/// Handle to a scheduled timer, used for cancellation.
///
/// Ids are unique per scheduler and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    Manual,
    Monotonic(Instant),
}

type Callback = Box<dyn FnOnce()>;

struct SchedulerInner {
    clock: Clock,
    /// Logical time: the latest instant the scheduler has processed.
    now: Duration,
    next_id: u64,
    /// Pending callbacks keyed by `(deadline, id)`.
    queue: BTreeMap<(Duration, u64), Callback>,
    /// Reverse index for cancellation.
    deadlines: HashMap<u64, Duration>,
    fired: u64,
    cancelled: u64,
}

impl SchedulerInner {
    /// Current time on the underlying clock, never behind logical time.
    fn clock_now(&self) -> Duration {
        match self.clock {
            Clock::Manual => self.now,
            Clock::Monotonic(origin) => self.now.max(origin.elapsed()),
        }
    }

    /// Catch the logical clock up with real time, but never past the
    /// earliest unfired deadline. Overdue timers move `now` only when they fire.
    fn refresh(&mut self) {
        let mut target = self.clock_now();
        if let Some(&(deadline, _)) = self.queue.keys().next() {
            target = target.min(deadline);
        }
        self.now = self.now.max(target);
    }
}

/// A cooperative timer table shared by every component of one event loop.
///
/// Cloning is cheap and yields a handle to the same table.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("clock", &inner.clock)
            .field("now", &inner.now)
            .field("pending", &inner.queue.len())
            .field("fired", &inner.fired)
            .field("cancelled", &inner.cancelled)
            .finish()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::monotonic()
    }
}

impl Scheduler {
    /// Create a scheduler on a virtual clock starting at zero.
    #[must_use]
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual)
    }

    /// Create a scheduler on the monotonic clock, anchored at the current instant.
    #[must_use]
    pub fn monotonic() -> Self {
        Self::with_clock(Clock::Monotonic(Instant::now()))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                clock,
                now: Duration::ZERO,
                next_id: 1,
                queue: BTreeMap::new(),
                deadlines: HashMap::new(),
                fired: 0,
                cancelled: 0,
            })),
        }
    }

    /// Whether this scheduler runs on a virtual clock.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self.inner.borrow().clock, Clock::Manual)
    }

    /// Current logical time since the scheduler was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Register `callback` to run once, `delay` after the current time.
    pub fn schedule(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        inner.refresh();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now.saturating_add(delay);
        inner.queue.insert((deadline, id), Box::new(callback));
        inner.deadlines.insert(id, deadline);
        trace!(
            timer = id,
            delay_ms = delay.as_millis() as u64,
            deadline_ms = deadline.as_millis() as u64,
            "timer scheduled"
        );
        TimerId(id)
    }

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer was pending and will now never fire.
    pub fn cancel(&self, id: TimerId) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            let Some(deadline) = inner.deadlines.remove(&id.0) else {
                return false;
            };
            inner.cancelled += 1;
            inner.queue.remove(&(deadline, id.0))
        };
        trace!(timer = id.0, "timer cancelled");
        // Dropped outside the borrow: captured state may touch the scheduler.
        drop(callback);
        true
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().deadlines.contains_key(&id.0)
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .queue
            .keys()
            .next()
            .map(|&(deadline, _)| deadline)
    }

    /// Time left until the earliest pending timer is due.
    ///
    /// Zero when a timer is already overdue.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        let now = inner.clock_now();
        inner
            .queue
            .keys()
            .next()
            .map(|&(deadline, _)| deadline.saturating_sub(now))
    }

    /// Advance logical time by `by`, firing every timer that falls due.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        self.advance_to(target)
    }

    /// Advance logical time to `target`, firing every timer due at or before it.
    ///
    /// Timers scheduled by a firing callback are honored in the same pass
    /// when their deadline is within `target`. Time never moves backwards.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .queue
                    .keys()
                    .next()
                    .copied()
                    .filter(|&(deadline, _)| deadline <= target);
                match due {
                    Some(key @ (deadline, id)) => {
                        inner.deadlines.remove(&id);
                        inner.now = inner.now.max(deadline);
                        inner.fired += 1;
                        inner.queue.remove(&key).map(|callback| (id, callback))
                    }
                    None => {
                        inner.now = inner.now.max(target);
                        None
                    }
                }
            };
            let Some((id, callback)) = next else {
                break;
            };
            trace!(timer = id, "timer fired");
            callback();
            fired += 1;
        }
        fired
    }

    /// Fire every timer that is due right now.
    ///
    /// On a monotonic scheduler this first catches up with real time; on a
    /// manual scheduler it only flushes timers due at the current virtual time.
    pub fn poll(&self) -> usize {
        let target = self.inner.borrow().clock_now();
        self.advance_to(target)
    }
}
