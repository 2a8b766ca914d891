#![forbid(unsafe_code)]

//! Runtime state for the catalogue front end.
//!
//! - [`reactive`]: observable values and the debounced input cell
//! - [`notify`]: the self-expiring notification queue behind success/error banners
//!
//! Everything here is single-threaded and driven by a
//! [`Scheduler`](shelf_core::Scheduler): writes return immediately and their
//! delayed effects run as scheduler callbacks.

pub mod notify;
pub mod reactive;

pub use notify::{Notification, NotificationId, NotificationKind, NotificationQueue};
pub use reactive::{DebouncedValueCell, Observable, Subscription, WeakObservable};
