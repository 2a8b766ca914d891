#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Verify that the runtime emits structured events for notification
//! lifecycle changes and debounced publications, and that the fields carry
//! the ids a log reader needs to correlate them.
//!
//!   cargo test -p shelf-runtime --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shelf_core::Scheduler;
use shelf_runtime::{DebouncedValueCell, NotificationQueue};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event with its message, level and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Handle to read captured events after the closure ran.
struct CaptureHandle {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.message == message)
            .collect()
    }
}

/// Visitor that extracts event fields.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Set up a tracing subscriber with event capture and run a closure.
fn with_captured_events<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { events }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// Notification events
// ============================================================================

#[test]
fn add_emits_debug_event_with_id_and_kind() {
    let mut added = None;
    let handle = with_captured_events(|| {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        added = Some(queue.error_for("Save failed", ms(250)));
    });
    let id = added.unwrap();

    let events = handle.with_message("notification added");
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.fields["id"], id.raw().to_string());
    assert_eq!(event.fields["kind"], "error");
    assert_eq!(event.fields["duration_ms"], "250");
}

#[test]
fn dismiss_and_expiry_are_distinguished() {
    let handle = with_captured_events(|| {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        let dismissed = queue.success_for("a", ms(100));
        queue.success_for("b", ms(100));
        queue.remove(dismissed);
        queue.remove(dismissed);
        scheduler.advance(ms(100));
    });

    assert_eq!(handle.with_message("notification dismissed").len(), 1);
    assert_eq!(handle.with_message("notification expired").len(), 1);
}

#[test]
fn no_text_in_notification_events() {
    let handle = with_captured_events(|| {
        let scheduler = Scheduler::manual();
        let queue = NotificationQueue::new(&scheduler);
        queue.success("private title");
    });

    for event in handle.events() {
        assert!(event.fields.values().all(|v| !v.contains("private title")));
    }
}

// ============================================================================
// Debounce events
// ============================================================================

#[test]
fn superseded_writes_are_traced() {
    let handle = with_captured_events(|| {
        let scheduler = Scheduler::manual();
        let cell = DebouncedValueCell::new(String::new(), ms(300), &scheduler);
        cell.set("d".into());
        cell.set("du".into());
        cell.set("dune".into());
        scheduler.advance(ms(300));
    });

    assert_eq!(handle.with_message("debounced write superseded").len(), 2);
    let settled = handle.with_message("debounced write settled");
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].level, tracing::Level::TRACE);
}

#[test]
fn teardown_discard_is_traced() {
    let handle = with_captured_events(|| {
        let scheduler = Scheduler::manual();
        let cell = DebouncedValueCell::new(0u8, ms(300), &scheduler);
        cell.set(1);
        drop(cell);
        scheduler.advance(ms(300));
    });

    assert_eq!(handle.with_message("debounced write discarded").len(), 1);
    assert!(handle.with_message("debounced write settled").is_empty());
}
