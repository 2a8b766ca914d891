//! Property-based invariant tests for the debounced cell and the
//! notification queue.
//!
//! DebouncedValueCell (1–4):
//! 1. A burst of writes spaced closer than the delay publishes once, with
//!    the last value, exactly `delay` after the last write.
//! 2. Writes spaced at least `delay` apart each publish.
//! 3. Reads between writes never observe an unpublished value.
//! 4. Dropping the cell with a pending write publishes nothing.
//!
//! NotificationQueue (5–8):
//! 5. Ids are strictly increasing in insertion order.
//! 6. Every message is gone once its duration has elapsed, and present before.
//! 7. Any interleaving of manual removes and expirations leaves the queue empty.
//! 8. Remaining messages keep insertion order.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use shelf_core::Scheduler;
use shelf_runtime::{DebouncedValueCell, NotificationKind, NotificationQueue};

// ── Strategies ────────────────────────────────────────────────────────────

fn delay_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000
}

/// Gaps strictly shorter than `delay`.
fn burst_strategy() -> impl Strategy<Value = (u64, Vec<u64>)> {
    delay_strategy().prop_flat_map(|delay| {
        (
            Just(delay),
            prop::collection::vec(0..delay, 0..32),
        )
    })
}

fn kind_strategy() -> impl Strategy<Value = NotificationKind> {
    prop_oneof![Just(NotificationKind::Success), Just(NotificationKind::Error)]
}

fn messages_strategy() -> impl Strategy<Value = Vec<(NotificationKind, u64, bool)>> {
    // (kind, duration_ms, dismiss_early)
    prop::collection::vec((kind_strategy(), 0u64..=5_000, any::<bool>()), 1..24)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

proptest! {
    #[test]
    fn burst_settles_once_with_last_value((delay, gaps) in burst_strategy()) {
        let scheduler = Scheduler::manual();
        let cell = DebouncedValueCell::new(0usize, ms(delay), &scheduler);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let clock = scheduler.clone();
        let _sub = cell.subscribe(move |v| sink.borrow_mut().push((*v, clock.now())));

        cell.set(1);
        for (index, gap) in gaps.iter().enumerate() {
            scheduler.advance(ms(*gap));
            prop_assert_eq!(cell.get(), 0);
            cell.set(index + 2);
        }
        let last_write = scheduler.now();
        scheduler.advance(ms(delay * 2));

        let expected = vec![(gaps.len() + 1, last_write + ms(delay))];
        prop_assert_eq!(seen.borrow().clone(), expected);
        prop_assert_eq!(cell.version(), 1);
    }

    #[test]
    fn spaced_writes_each_publish(delay in delay_strategy(), writes in 1usize..16) {
        let scheduler = Scheduler::manual();
        let cell = DebouncedValueCell::new(0usize, ms(delay), &scheduler);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = cell.subscribe(move |v| sink.borrow_mut().push(*v));

        for value in 1..=writes {
            cell.set(value);
            scheduler.advance(ms(delay));
        }
        prop_assert_eq!(seen.borrow().clone(), (1..=writes).collect::<Vec<_>>());
    }

    #[test]
    fn teardown_publishes_nothing((delay, gaps) in burst_strategy()) {
        let scheduler = Scheduler::manual();
        let cell = DebouncedValueCell::new(0u32, ms(delay), &scheduler);
        let seen = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&seen);
        let sub = cell.subscribe(move |_| *sink.borrow_mut() += 1);

        cell.set(1);
        for gap in &gaps {
            scheduler.advance(ms(*gap));
            cell.set(2);
        }
        drop(cell);
        scheduler.advance(ms(delay * 2));

        prop_assert_eq!(*seen.borrow(), 0);
        prop_assert_eq!(scheduler.pending_count(), 0);
        drop(sub);
    }

    #[test]
    fn ids_increase_in_insertion_order(plan in messages_strategy()) {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        let ids: Vec<_> = plan
            .iter()
            .map(|(kind, duration, _)| queue.add(*kind, "msg", ms(*duration)))
            .collect();

        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        let live: Vec<_> = queue.messages().iter().map(|n| n.id).collect();
        prop_assert_eq!(live, ids);
    }

    #[test]
    fn messages_expire_on_schedule(plan in messages_strategy()) {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        let entries: Vec<_> = plan
            .iter()
            .map(|(kind, duration, _)| (queue.add(*kind, "msg", ms(*duration)), *duration))
            .collect();

        let mut checkpoints: Vec<u64> = entries.iter().map(|(_, d)| *d).collect();
        checkpoints.sort_unstable();
        checkpoints.dedup();

        for checkpoint in checkpoints {
            if checkpoint > 0 {
                scheduler.advance_to(ms(checkpoint - 1));
                for (id, duration) in &entries {
                    prop_assert_eq!(queue.contains(*id), *duration > checkpoint - 1);
                }
            }
            scheduler.advance_to(ms(checkpoint));
            for (id, duration) in &entries {
                prop_assert_eq!(queue.contains(*id), *duration > checkpoint);
            }
        }
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn removes_and_expirations_converge(plan in messages_strategy()) {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        let entries: Vec<_> = plan
            .iter()
            .map(|(kind, duration, dismiss)| (queue.add(*kind, "msg", ms(*duration)), *dismiss))
            .collect();

        for (id, dismiss) in &entries {
            if *dismiss {
                prop_assert!(queue.remove(*id));
                prop_assert!(!queue.remove(*id));
            }
        }

        let remaining: Vec<_> = queue.messages().iter().map(|n| n.id).collect();
        let expected: Vec<_> = entries
            .iter()
            .filter(|(_, dismiss)| !dismiss)
            .map(|(id, _)| *id)
            .collect();
        prop_assert_eq!(remaining, expected);

        scheduler.advance(ms(5_000));
        prop_assert!(queue.is_empty());
        prop_assert_eq!(scheduler.pending_count(), 0);
    }
}
