//! Property-based invariant tests for the cooperative scheduler.
//!
//! 1. Every scheduled, non-cancelled timer fires exactly once.
//! 2. Cancelled timers never fire.
//! 3. Firing order is (deadline, scheduling order).
//! 4. Logical time after an advance equals the advance target.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use shelf_core::Scheduler;

// ── Strategies ────────────────────────────────────────────────────────────

fn plan_strategy() -> impl Strategy<Value = Vec<(u64, bool)>> {
    // (delay_ms, cancel_before_advance)
    prop::collection::vec((0u64..=500, any::<bool>()), 0..64)
}

proptest! {
    #[test]
    fn fires_exactly_the_uncancelled_timers_in_order(plan in plan_strategy()) {
        let scheduler = Scheduler::manual();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let mut ids = Vec::new();
        for (index, (delay, _)) in plan.iter().enumerate() {
            let sink = Rc::clone(&fired);
            let id = scheduler.schedule(Duration::from_millis(*delay), move || {
                sink.borrow_mut().push(index);
            });
            ids.push(id);
        }
        for (id, (_, cancel)) in ids.iter().zip(&plan) {
            if *cancel {
                prop_assert!(scheduler.cancel(*id));
            }
        }

        scheduler.advance(Duration::from_millis(1_000));

        let mut expected: Vec<usize> = plan
            .iter()
            .enumerate()
            .filter(|(_, (_, cancel))| !cancel)
            .map(|(index, _)| index)
            .collect();
        expected.sort_by_key(|&index| (plan[index].0, index));

        prop_assert_eq!(&*fired.borrow(), &expected);
        prop_assert_eq!(scheduler.pending_count(), 0);
        prop_assert_eq!(scheduler.now(), Duration::from_millis(1_000));
    }

    #[test]
    fn split_advances_match_single_advance(
        delays in prop::collection::vec(0u64..=300, 1..32),
        step in 1u64..=50,
    ) {
        let run = |steps: &[u64]| {
            let scheduler = Scheduler::manual();
            let fired = Rc::new(RefCell::new(Vec::new()));
            for (index, delay) in delays.iter().enumerate() {
                let sink = Rc::clone(&fired);
                let handle = scheduler.clone();
                scheduler.schedule(Duration::from_millis(*delay), move || {
                    sink.borrow_mut().push((index, handle.now()));
                });
            }
            for s in steps {
                scheduler.advance(Duration::from_millis(*s));
            }
            fired.take()
        };

        let single = run(&[400]);
        let chunks = vec![step; (400 / step) as usize + 1];
        let split = run(&chunks);
        prop_assert_eq!(single, split);
    }
}
