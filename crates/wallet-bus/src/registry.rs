//! # Subscription Registry
//!
//! Owns the mapping from subscriber identity to active subscriptions and
//! provides atomic register/unregister operations.
//!
//! Every mutation and every snapshot read runs under a single mutex scoped
//! to the registry instance. The guard is held only for the in-memory map
//! update or copy, never across handler invocation, so a handler that
//! itself subscribes or unsubscribes cannot deadlock the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::events::{EventKind, WalletEvent};

/// Grouping identity used for bulk subscription teardown.
///
/// Callers supply it explicitly (typically one key per screen or model)
/// instead of relying on object identity, so ownership and lifetime are
/// visible at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Create an owner key with a caller-chosen name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create a collision-free owner key for anonymous subscribers.
    #[must_use]
    pub fn unique() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for OwnerKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of one subscription.
///
/// Generated at registration and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The thread/queue discipline a handler runs under when an event is
/// dispatched to its subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Ordered delivery on the named serial queue.
    Serial(String),
    /// Unordered delivery on the shared worker pool.
    Pool,
    /// Synchronous delivery on the publishing thread. Used sparingly; the
    /// caller must tolerate re-entrancy.
    Inline,
}

impl ExecutionContext {
    /// The designated serial context UI code subscribes on.
    #[must_use]
    pub fn main() -> Self {
        Self::Serial(crate::MAIN_CONTEXT.to_string())
    }
}

/// Callback invoked with each delivered event.
pub type EventHandler = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

/// One observer's interest in one event kind.
///
/// Immutable once registered; removal (map-entry deletion) is the only
/// lifecycle change.
pub struct Subscription {
    id: SubscriptionId,
    owner: OwnerKey,
    kind: EventKind,
    context: ExecutionContext,
    handler: EventHandler,
}

impl Subscription {
    /// Unique identifier of this subscription.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The owner key this subscription is grouped under.
    #[must_use]
    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// The event kind this subscription listens for.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The execution context requested at subscribe time.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Invoke the handler with `event` on the calling thread.
    ///
    /// Panics inside the handler propagate to the caller; the dispatcher
    /// is responsible for isolating them.
    pub fn deliver(&self, event: &WalletEvent) {
        (*self.handler)(event);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Registry of active subscriptions, grouped per event kind.
///
/// The internal map is the only mutable shared state in the bus core.
#[derive(Default)]
pub struct SubscriptionRegistry {
    by_kind: Mutex<HashMap<EventKind, Vec<Arc<Subscription>>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription and return its unique id.
    ///
    /// Insertion order among subscriptions of the same kind is preserved;
    /// dispatch order equals registration order.
    pub fn register(
        &self,
        owner: OwnerKey,
        kind: EventKind,
        context: ExecutionContext,
        handler: EventHandler,
    ) -> SubscriptionId {
        let subscription = Arc::new(Subscription {
            id: SubscriptionId::generate(),
            owner,
            kind,
            context,
            handler,
        });
        let id = subscription.id;

        self.lock().entry(kind).or_default().push(subscription);

        debug!(%kind, %id, "Subscription registered");
        id
    }

    /// Remove every subscription owned by `owner`, regardless of kind.
    ///
    /// No-op if the owner has none.
    pub fn unregister_all(&self, owner: &OwnerKey) {
        let mut map = self.lock();
        for subscriptions in map.values_mut() {
            subscriptions.retain(|sub| &sub.owner != owner);
        }
        map.retain(|_, subscriptions| !subscriptions.is_empty());
        drop(map);

        debug!(%owner, "Owner unregistered from all kinds");
    }

    /// Remove only the subscriptions for this owner+kind pair.
    ///
    /// No-op if the pair has none.
    pub fn unregister(&self, owner: &OwnerKey, kind: EventKind) {
        let mut map = self.lock();
        if let Some(subscriptions) = map.get_mut(&kind) {
            subscriptions.retain(|sub| &sub.owner != owner);
            if subscriptions.is_empty() {
                map.remove(&kind);
            }
        }
        drop(map);

        debug!(%owner, %kind, "Owner unregistered from kind");
    }

    /// Remove a single subscription by id.
    ///
    /// No-op if the id is no longer registered.
    pub fn unregister_id(&self, id: SubscriptionId) {
        let mut map = self.lock();
        for subscriptions in map.values_mut() {
            subscriptions.retain(|sub| sub.id != id);
        }
        map.retain(|_, subscriptions| !subscriptions.is_empty());
        drop(map);

        debug!(%id, "Subscription removed");
    }

    /// Ordered defensive copy of the subscriptions for `kind`.
    ///
    /// Concurrent mutation of the registry never affects iteration over a
    /// snapshot already taken.
    #[must_use]
    pub fn snapshot(&self, kind: EventKind) -> Vec<Arc<Subscription>> {
        self.lock().get(&kind).cloned().unwrap_or_default()
    }

    /// Total number of active subscriptions across all kinds.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    // The guard is never held across handler execution, so a poisoning
    // panic cannot have left the map mid-update; recover the guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<Arc<Subscription>>>> {
        self.by_kind.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
