//! # Wallet Events
//!
//! The closed catalog of event kinds recognized by the bus, and the
//! ephemeral event value delivered to subscribers.
//!
//! The catalog is the shared vocabulary between producers (engine callback
//! shims, UI actions, internal timers) and consumers (screens, models).
//! It is closed: nothing can extend it at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from bus operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    /// The named event kind is not part of the catalog.
    ///
    /// Programmer error: producers at integration boundaries must only
    /// reference catalog names.
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),
}

/// All event kinds that can flow through the wallet event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // =========================================================================
    // WALLET ENGINE CALLBACKS
    // =========================================================================
    /// An inbound transaction was received.
    ReceivedTx,
    /// The counterparty replied to a pending transaction.
    ReceivedTxReply,
    /// An inbound transaction was finalized.
    ReceivedFinalizedTx,
    /// A transaction was broadcast to the base layer.
    TxBroadcast,
    /// A transaction was mined and confirmed.
    TxMined,
    /// A transaction was mined but is not yet confirmed.
    TxMinedUnconfirmed,
    /// A direct peer-to-peer send completed.
    DirectSend,
    /// A store-and-forward send completed.
    StoreAndForwardSend,
    /// A pending transaction was cancelled.
    TxCancellation,
    /// Transaction validation finished successfully.
    TxValidationSuccessful,
    /// Sync with the base node started.
    BaseNodeSyncStarted,
    /// Sync with the base node completed.
    BaseNodeSyncComplete,

    // =========================================================================
    // UI-INTERNAL SIGNALS
    // =========================================================================
    /// The transaction list should refresh.
    TxListUpdate,
    /// The displayed balance should refresh.
    BalanceUpdate,
    /// Wallet state changed in a way that requires a fresh backup.
    RequiresBackup,

    // =========================================================================
    // BASE-LAYER CONNECTIVITY
    // =========================================================================
    /// Connection to the base layer is progressing (payload: percentage).
    BaseLayerConnectionProgress,
    /// Connection to the base layer was established.
    BaseLayerConnected,
    /// Connection to the base layer failed.
    BaseLayerConnectionFailed,
    /// The connection monitor observed a status change.
    ConnectionStatusChanged,

    // =========================================================================
    // RESTORE FLOW
    // =========================================================================
    /// Progress update while restoring a wallet from seed words.
    RestoreWalletStatusUpdate,
}

impl EventKind {
    /// Every member of the catalog, in declaration order.
    pub const ALL: [EventKind; 20] = [
        Self::ReceivedTx,
        Self::ReceivedTxReply,
        Self::ReceivedFinalizedTx,
        Self::TxBroadcast,
        Self::TxMined,
        Self::TxMinedUnconfirmed,
        Self::DirectSend,
        Self::StoreAndForwardSend,
        Self::TxCancellation,
        Self::TxValidationSuccessful,
        Self::BaseNodeSyncStarted,
        Self::BaseNodeSyncComplete,
        Self::TxListUpdate,
        Self::BalanceUpdate,
        Self::RequiresBackup,
        Self::BaseLayerConnectionProgress,
        Self::BaseLayerConnected,
        Self::BaseLayerConnectionFailed,
        Self::ConnectionStatusChanged,
        Self::RestoreWalletStatusUpdate,
    ];

    /// Stable string identifier for this kind.
    ///
    /// Identifiers never change once released; producers outside the process
    /// boundary reference kinds by these names.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceivedTx => "received-tx",
            Self::ReceivedTxReply => "received-tx-reply",
            Self::ReceivedFinalizedTx => "received-finalized-tx",
            Self::TxBroadcast => "tx-broadcast",
            Self::TxMined => "tx-mined",
            Self::TxMinedUnconfirmed => "tx-mined-unconfirmed",
            Self::DirectSend => "direct-send",
            Self::StoreAndForwardSend => "store-and-forward-send",
            Self::TxCancellation => "tx-cancellation",
            Self::TxValidationSuccessful => "tx-validation-successful",
            Self::BaseNodeSyncStarted => "base-node-sync-started",
            Self::BaseNodeSyncComplete => "base-node-sync-complete",
            Self::TxListUpdate => "tx-list-update",
            Self::BalanceUpdate => "balance-update",
            Self::RequiresBackup => "requires-backup",
            Self::BaseLayerConnectionProgress => "base-layer-connection-progress",
            Self::BaseLayerConnected => "base-layer-connected",
            Self::BaseLayerConnectionFailed => "base-layer-connection-failed",
            Self::ConnectionStatusChanged => "connection-status-changed",
            Self::RestoreWalletStatusUpdate => "restore-wallet-status-update",
        }
    }

    /// Resolve a stable name back to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnknownEventKind`] if the name is outside the
    /// closed catalog.
    pub fn from_name(name: &str) -> Result<Self, BusError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BusError::UnknownEventKind(name.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event in flight.
///
/// Exists only for the duration of one publish call and the handler
/// invocations it schedules; the bus never persists events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEvent {
    kind: EventKind,
    payload: Option<Value>,
    origin: Option<Value>,
}

impl WalletEvent {
    /// Create an event with an optional payload and origin.
    #[must_use]
    pub fn new(kind: EventKind, payload: Option<Value>, origin: Option<Value>) -> Self {
        Self {
            kind,
            payload,
            origin,
        }
    }

    /// The kind this event was published under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Structured payload, if the producer attached one.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Producer identity, if the producer attached one.
    #[must_use]
    pub fn origin(&self) -> Option<&Value> {
        self.origin.as_ref()
    }
}
