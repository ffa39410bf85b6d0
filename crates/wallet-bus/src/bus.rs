//! # Event Bus Facade
//!
//! The public surface combining catalog, registry and dispatcher into
//! publish/subscribe/unsubscribe operations. This is the only surface
//! external collaborators use.
//!
//! The bus is an explicitly constructed instance injected into its
//! collaborators rather than an implicit global: the application wires one
//! bus for the process lifetime, and tests construct a fresh bus per test.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::events::{BusError, EventKind, WalletEvent};
use crate::registry::{ExecutionContext, OwnerKey, SubscriptionId, SubscriptionRegistry};
use crate::stream::EventStream;

/// Opaque handle identifying one subscription, for callers that want
/// per-subscription rather than per-owner teardown.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    owner: OwnerKey,
    kind: EventKind,
}

impl SubscriptionHandle {
    /// Unique identifier of the subscription behind this handle.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The owner key the subscription was registered under.
    #[must_use]
    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// The event kind the subscription listens for.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// The wallet event bus.
///
/// Safe to publish from arbitrary threads and to subscribe/unsubscribe from
/// any thread, including during view lifecycle churn.
pub struct EventBus {
    registry: Arc<SubscriptionRegistry>,
    dispatcher: Dispatcher,
    events_published: AtomicU64,
}

impl EventBus {
    /// Create a bus scheduling deliveries on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime; use [`EventBus::with_runtime`]
    /// from plain threads.
    #[must_use]
    pub fn new() -> Self {
        Self::with_runtime(Handle::current())
    }

    /// Create a bus scheduling pool and serial deliveries on `runtime`.
    #[must_use]
    pub fn with_runtime(runtime: Handle) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), runtime);
        Self {
            registry,
            dispatcher,
            events_published: AtomicU64::new(0),
        }
    }

    /// Publish an event. Fire-and-forget: returns as soon as every matching
    /// subscription has been scheduled (inline handlers run before return).
    pub fn publish(&self, kind: EventKind, payload: Option<Value>, origin: Option<Value>) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.dispatcher
            .dispatch(WalletEvent::new(kind, payload, origin));
    }

    /// Publish under a catalog name, validating it first.
    ///
    /// This is the integration-boundary entry point for producers that carry
    /// kinds as strings (engine callback shims).
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnknownEventKind`] if `name` is outside the
    /// catalog; no handler is invoked in that case.
    pub fn publish_named(
        &self,
        name: &str,
        payload: Option<Value>,
        origin: Option<Value>,
    ) -> Result<(), BusError> {
        let kind = EventKind::from_name(name)?;
        self.publish(kind, payload, origin);
        Ok(())
    }

    /// Subscribe `owner` to `kind`, running `handler` on `context`.
    ///
    /// The returned handle can be passed to [`EventBus::remove`] for
    /// targeted teardown of just this subscription.
    pub fn subscribe<F>(
        &self,
        owner: &OwnerKey,
        kind: EventKind,
        context: ExecutionContext,
        handler: F,
    ) -> SubscriptionHandle
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        let id = self
            .registry
            .register(owner.clone(), kind, context, Arc::new(handler));
        SubscriptionHandle {
            id,
            owner: owner.clone(),
            kind,
        }
    }

    /// Remove every subscription owned by `owner`. Idempotent.
    pub fn unsubscribe(&self, owner: &OwnerKey) {
        self.registry.unregister_all(owner);
    }

    /// Remove only `owner`'s subscriptions for `kind`. Idempotent.
    pub fn unsubscribe_kind(&self, owner: &OwnerKey, kind: EventKind) {
        self.registry.unregister(owner, kind);
    }

    /// Remove the single subscription behind `handle`. Idempotent.
    pub fn remove(&self, handle: &SubscriptionHandle) {
        debug!(id = %handle.id, "Removing subscription by handle");
        self.registry.unregister_id(handle.id);
    }

    /// A pull-style stream of events of `kind`.
    ///
    /// Every call creates an independent live subscription; drop the stream
    /// to stop receiving.
    #[must_use]
    pub fn events(&self, kind: EventKind) -> EventStream {
        EventStream::new(kind, Arc::clone(&self.registry))
    }

    /// Total number of events published on this bus.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Number of active subscriptions across all kinds.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.registry.subscription_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
