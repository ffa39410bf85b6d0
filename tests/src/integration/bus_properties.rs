//! # Bus Delivery Properties
//!
//! Exercises the guarantees screens rely on during lifecycle churn:
//!
//! 1. **Delivery completeness**: an uninterrupted subscribe→publish pair
//!    invokes the handler exactly once with the published payload.
//! 2. **Teardown isolation**: unsubscribing one owner never silences
//!    another.
//! 3. **Owner-scoped bulk removal**: one call tears down every kind an
//!    owner registered for.
//! 4. **Idempotent unsubscribe**: repeated or pointless unsubscribes are
//!    harmless.
//! 5. **Registration-order delivery** on a shared serial context.
//! 6. **Handler isolation**: a panicking subscriber cannot break the
//!    publisher or its peers.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use parking_lot::Mutex;

#[cfg(test)]
use serde_json::json;

#[cfg(test)]
use tokio::time::{sleep, timeout};

#[cfg(test)]
use tokio_stream::StreamExt;

#[cfg(test)]
use wallet_bus::{BusError, EventBus, EventKind, ExecutionContext, OwnerKey};

/// Poll `predicate` until it holds or a second passes.
#[cfg(test)]
async fn eventually(predicate: impl Fn() -> bool) {
    timeout(Duration::from_secs(1), async {
        while !predicate() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_then_publish_delivers_payload_exactly_once() {
        crate::init_tracing();
        let bus = EventBus::new();
        let owner = OwnerKey::from("screenX");

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        bus.subscribe(
            &owner,
            EventKind::BalanceUpdate,
            ExecutionContext::main(),
            move |event| {
                sink.lock().push(event.payload().cloned());
            },
        );

        bus.publish(
            EventKind::BalanceUpdate,
            Some(json!({ "balance": 1000 })),
            None,
        );

        eventually(|| received.lock().len() == 1).await;
        assert_eq!(received.lock()[0], Some(json!({ "balance": 1000 })));

        // No duplicate delivery arrives later.
        sleep(Duration::from_millis(50)).await;
        assert_eq!(received.lock().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribing_one_owner_leaves_the_other() {
        let bus = EventBus::new();
        let screen_x = OwnerKey::from("screenX");
        let screen_y = OwnerKey::from("screenY");

        let x_count = Arc::new(AtomicUsize::new(0));
        let y_count = Arc::new(AtomicUsize::new(0));

        let x_sink = Arc::clone(&x_count);
        bus.subscribe(
            &screen_x,
            EventKind::TxMined,
            ExecutionContext::Inline,
            move |_event| {
                x_sink.fetch_add(1, Ordering::SeqCst);
            },
        );
        let y_sink = Arc::clone(&y_count);
        bus.subscribe(
            &screen_y,
            EventKind::TxMined,
            ExecutionContext::Inline,
            move |_event| {
                y_sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.unsubscribe(&screen_x);
        bus.publish(EventKind::TxMined, None, None);

        assert_eq!(x_count.load(Ordering::SeqCst), 0);
        assert_eq!(y_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bulk_removal_covers_every_kind() {
        let bus = EventBus::new();
        let owner = OwnerKey::from("screen-home");

        let count = Arc::new(AtomicUsize::new(0));
        for kind in [EventKind::BalanceUpdate, EventKind::TxListUpdate] {
            let sink = Arc::clone(&count);
            bus.subscribe(&owner, kind, ExecutionContext::Inline, move |_event| {
                sink.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.unsubscribe(&owner);
        bus.publish(EventKind::BalanceUpdate, None, None);
        bus.publish(EventKind::TxListUpdate, None, None);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscription_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let owner = OwnerKey::from("screen-gone");

        // Unsubscribing an owner with zero subscriptions never raises.
        bus.unsubscribe(&owner);
        bus.unsubscribe(&owner);

        let other = OwnerKey::from("screen-alive");
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        bus.subscribe(
            &other,
            EventKind::TxMined,
            ExecutionContext::Inline,
            move |_event| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.unsubscribe(&owner);
        bus.publish(EventKind::TxMined, None, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn serial_context_delivers_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["h1", "h2"] {
            let sink = Arc::clone(&order);
            bus.subscribe(
                &OwnerKey::named(label),
                EventKind::TxListUpdate,
                ExecutionContext::main(),
                move |_event| {
                    sink.lock().push(label);
                },
            );
        }

        bus.publish(EventKind::TxListUpdate, None, None);

        eventually(|| order.lock().len() == 2).await;
        assert_eq!(*order.lock(), vec!["h1", "h2"]);
    }

    #[tokio::test]
    async fn panicking_handler_is_isolated() {
        let bus = EventBus::new();

        bus.subscribe(
            &OwnerKey::from("broken"),
            EventKind::TxMined,
            ExecutionContext::Inline,
            |_event| panic!("subscriber bug"),
        );
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        bus.subscribe(
            &OwnerKey::from("healthy"),
            EventKind::TxMined,
            ExecutionContext::Inline,
            move |_event| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        // The publisher survives and the later snapshot entry still runs.
        bus.publish(EventKind::TxMined, None, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_kind_fails_before_any_delivery() {
        let bus = EventBus::new();

        let count = Arc::new(AtomicUsize::new(0));
        for kind in EventKind::ALL {
            let sink = Arc::clone(&count);
            bus.subscribe(
                &OwnerKey::unique(),
                kind,
                ExecutionContext::Inline,
                move |_event| {
                    sink.fetch_add(1, Ordering::SeqCst);
                },
            );
        }

        let result = bus.publish_named("not-a-real-event", None, None);
        assert_eq!(
            result,
            Err(BusError::UnknownEventKind("not-a-real-event".to_string()))
        );
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_added_during_dispatch_misses_the_inflight_event() {
        // Snapshot-at-dispatch-time is a deliberate decision: a
        // subscription created while a publish is being delivered only
        // sees subsequent publishes.
        let bus = Arc::new(EventBus::new());

        let late_count = Arc::new(AtomicUsize::new(0));
        let first_bus = Arc::clone(&bus);
        let late_sink = Arc::clone(&late_count);
        bus.subscribe(
            &OwnerKey::from("eager"),
            EventKind::TxMined,
            ExecutionContext::Inline,
            move |_event| {
                let sink = Arc::clone(&late_sink);
                first_bus.subscribe(
                    &OwnerKey::unique(),
                    EventKind::TxMined,
                    ExecutionContext::Inline,
                    move |_event| {
                        sink.fetch_add(1, Ordering::SeqCst);
                    },
                );
            },
        );

        bus.publish(EventKind::TxMined, None, None);
        assert_eq!(late_count.load(Ordering::SeqCst), 0);

        // The next publish reaches the handler added during the first one.
        bus.publish(EventKind::TxMined, None, None);
        assert_eq!(late_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pull_stream_composes_with_combinators() {
        let bus = EventBus::new();
        let mut progress = bus
            .events(EventKind::BaseLayerConnectionProgress)
            .filter_map(|event| event.payload().and_then(|p| p.as_u64()));

        for pct in [25u64, 50, 100] {
            bus.publish(
                EventKind::BaseLayerConnectionProgress,
                Some(json!(pct)),
                None,
            );
        }

        for expected in [25u64, 50, 100] {
            let got = timeout(Duration::from_secs(1), progress.next())
                .await
                .expect("timeout")
                .expect("value");
            assert_eq!(got, expected);
        }
    }

    #[tokio::test]
    async fn concurrent_publishers_reach_every_subscriber() {
        let bus = Arc::new(EventBus::new());

        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        bus.subscribe(
            &OwnerKey::from("audit"),
            EventKind::TxBroadcast,
            ExecutionContext::main(),
            move |_event| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let bus = Arc::clone(&bus);
            tasks.push(tokio::spawn(async move {
                for _ in 0..100 {
                    bus.publish(EventKind::TxBroadcast, None, None);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        eventually(|| count.load(Ordering::SeqCst) == 400).await;
    }
}
