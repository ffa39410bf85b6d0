//! # Wallet Bus - Event Bus for the Mobile Wallet Runtime
//!
//! Decouples asynchronous notifications (wallet-engine callbacks, UI
//! actions, internal state changes) from the many short-lived observers
//! (screens, models) that react to them.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Engine shim  │                    │   Screen     │
//! │  (any thread)│    publish()       │ (UI thread)  │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe() / unsubscribe()
//! ```
//!
//! ## Guarantees
//!
//! - Publish is safe from arbitrary threads; subscribe/unsubscribe are safe
//!   from any thread during view lifecycle churn.
//! - Teardown is deterministic per owner key: after `unsubscribe(owner)` no
//!   future dispatch reaches that owner's handlers.
//! - Each subscription chooses its delivery context: a named serial queue,
//!   the worker pool, or inline on the publishing thread.
//! - Dispatch iterates a snapshot taken under the registry guard; one
//!   broken subscriber never affects another or the publisher.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod dispatch;
pub mod events;
pub mod registry;
pub mod stream;

// Re-export main types
pub use bus::{EventBus, SubscriptionHandle};
pub use dispatch::Dispatcher;
pub use events::{BusError, EventKind, WalletEvent};
pub use registry::{
    EventHandler, ExecutionContext, OwnerKey, Subscription, SubscriptionId, SubscriptionRegistry,
};
pub use stream::EventStream;

/// Name of the designated serial context the UI layer subscribes on.
pub const MAIN_CONTEXT: &str = "main";
