//! # Event Stream
//!
//! Pull-style view over the bus for consumers that prefer composing
//! transformations (filter/map) over push callbacks.
//!
//! Each stream is an independent live subscription: events published after
//! creation are buffered until polled, and dropping the stream cancels the
//! subscription.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use crate::events::{EventKind, WalletEvent};
use crate::registry::{EventHandler, ExecutionContext, OwnerKey, SubscriptionRegistry};

/// An infinite stream of [`WalletEvent`]s of one kind.
pub struct EventStream {
    kind: EventKind,
    owner: OwnerKey,
    registry: Arc<SubscriptionRegistry>,
    receiver: mpsc::UnboundedReceiver<WalletEvent>,
}

impl EventStream {
    pub(crate) fn new(kind: EventKind, registry: Arc<SubscriptionRegistry>) -> Self {
        let owner = OwnerKey::unique();
        let (sender, receiver) = mpsc::unbounded_channel();

        // Inline context: forwarding into the channel is cheap and keeps
        // per-publish ordering for this stream.
        let handler: EventHandler = Arc::new(move |event: &WalletEvent| {
            // The receiving side may already be gone; dispatch from an
            // earlier snapshot is not an error.
            let _ = sender.send(event.clone());
        });
        registry.register(owner.clone(), kind, ExecutionContext::Inline, handler);

        Self {
            kind,
            owner,
            registry,
            receiver,
        }
    }

    /// The event kind this stream yields.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Stream for EventStream {
    type Item = WalletEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        // The stream owns its hidden subscription; dropping it must stop
        // delivery.
        self.registry.unregister_all(&self.owner);
    }
}
