//! # Dispatcher
//!
//! Delivers a published event to every subscription snapshotted for its
//! kind, on each subscription's requested execution context.
//!
//! Serial contexts are backed by one FIFO queue each, drained by a single
//! task, which gives registration-order delivery within one publish call.
//! Pool delivery spawns onto the runtime's worker threads with no ordering
//! guarantee. Inline delivery runs on the publishing thread before
//! `dispatch` returns.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::events::WalletEvent;
use crate::registry::{ExecutionContext, Subscription, SubscriptionRegistry};

type SerialJob = Box<dyn FnOnce() + Send>;

/// Delivers events to snapshotted subscriptions.
pub struct Dispatcher {
    registry: Arc<SubscriptionRegistry>,
    runtime: Handle,
    // One sender per named serial context, created on first use. The drain
    // task lives for the process duration, like the bus itself.
    serial_contexts: Mutex<HashMap<String, mpsc::UnboundedSender<SerialJob>>>,
}

impl Dispatcher {
    /// Create a dispatcher that schedules pool and serial deliveries on
    /// `runtime`.
    ///
    /// Holding a runtime handle lets non-runtime threads (the engine
    /// callback thread) publish.
    #[must_use]
    pub fn new(registry: Arc<SubscriptionRegistry>, runtime: Handle) -> Self {
        Self {
            registry,
            runtime,
            serial_contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver `event` to every currently-registered subscription for its
    /// kind.
    ///
    /// Subscriptions are snapshotted once, under the registry guard, before
    /// any handler runs: a subscription added during this dispatch does not
    /// receive this event, and one removed during this dispatch is not
    /// retracted from the snapshot.
    pub fn dispatch(&self, event: WalletEvent) {
        let snapshot = self.registry.snapshot(event.kind());
        debug!(
            kind = %event.kind(),
            subscriptions = snapshot.len(),
            "Dispatching event"
        );

        for subscription in snapshot {
            match subscription.context() {
                ExecutionContext::Inline => invoke(&subscription, &event),
                ExecutionContext::Pool => {
                    let subscription = Arc::clone(&subscription);
                    let event = event.clone();
                    self.runtime.spawn(async move {
                        invoke(&subscription, &event);
                    });
                }
                ExecutionContext::Serial(name) => {
                    let job_subscription = Arc::clone(&subscription);
                    let job_event = event.clone();
                    let sender = self.serial_sender(name);
                    let job: SerialJob = Box::new(move || invoke(&job_subscription, &job_event));
                    if sender.send(job).is_err() {
                        error!(context = %name, kind = %event.kind(), "Serial context worker is gone; delivery dropped");
                    }
                }
            }
        }
    }

    fn serial_sender(&self, name: &str) -> mpsc::UnboundedSender<SerialJob> {
        let mut contexts = self
            .serial_contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(sender) = contexts.get(name) {
            return sender.clone();
        }

        let (sender, mut receiver) = mpsc::unbounded_channel::<SerialJob>();
        self.runtime.spawn(async move {
            while let Some(job) = receiver.recv().await {
                job();
            }
        });
        contexts.insert(name.to_string(), sender.clone());

        debug!(context = name, "Serial context started");
        sender
    }
}

/// Run one handler, isolating panics so a broken subscriber cannot affect
/// the rest of the snapshot or the publisher.
fn invoke(subscription: &Subscription, event: &WalletEvent) {
    if catch_unwind(AssertUnwindSafe(|| subscription.deliver(event))).is_err() {
        error!(
            kind = %event.kind(),
            owner = %subscription.owner(),
            id = %subscription.id(),
            "Event handler panicked during dispatch"
        );
    }
}
