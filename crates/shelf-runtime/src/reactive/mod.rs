#![forbid(unsafe_code)]

//! Reactive values for shelf.
//!
//! - [`Observable`]: a shared, version-tracked value with change notification
//!   via subscriber callbacks.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`DebouncedValueCell`]: a value whose writes only become visible after a
//!   quiet period, coalescing bursts of input into one publication.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification.
//!
//! `DebouncedValueCell<T>` keeps its settled value in an `Observable<T>` and
//! its pending write next to the handle of the one timer that will publish it.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per published write.
//! 2. Subscribers are notified in registration order, once per write.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 4. A debounced cell has at most one pending timer.
//! 5. Reads never observe a pending debounced write.

pub mod debounced;
pub mod observable;

pub use debounced::DebouncedValueCell;
pub use observable::{Observable, Subscription, WeakObservable};
