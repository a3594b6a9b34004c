//! Submission outcomes.

use serde::Serialize;

use registrar_types::TxHash;

/// Why a submission was rejected. Every failure an orchestrator run can
/// hit maps onto exactly one of these; collaborator errors never escape
/// as panics or opaque error chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// An unresolved record for this name already exists in the queue
    /// (or another submission for it is in flight right now).
    AlreadyQueued,
    /// The name is not registered on chain.
    NotRegistered,
    /// The transfer recipient is not eligible to receive another name.
    RecipientNotReady,
    /// The supplied owner key does not derive the on-chain owner address.
    NotOwner,
    /// The payment address has in-flight activity and must not be spent from.
    PaymentAddressUnusable,
    /// The payment address cannot cover the fee.
    PaymentAddressUnderfunded,
    /// No private key available for the payment address.
    PaymentKeyUnavailable,
    /// The remote builder failed or returned an unusable payload.
    RemoteBuildFailed,
    /// The chain node did not accept the signed transaction.
    BroadcastFailed,
    /// A remote call exceeded its configured timeout.
    RemoteTimeout,
    /// A chain-state or queue-state read failed before any transaction
    /// was attempted.
    ChainUnavailable,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::AlreadyQueued => "already_queued",
            RejectReason::NotRegistered => "not_registered",
            RejectReason::RecipientNotReady => "recipient_not_ready",
            RejectReason::NotOwner => "not_owner",
            RejectReason::PaymentAddressUnusable => "payment_address_unusable",
            RejectReason::PaymentAddressUnderfunded => "payment_address_underfunded",
            RejectReason::PaymentKeyUnavailable => "payment_key_unavailable",
            RejectReason::RemoteBuildFailed => "remote_build_failed",
            RejectReason::BroadcastFailed => "broadcast_failed",
            RejectReason::RemoteTimeout => "remote_timeout",
            RejectReason::ChainUnavailable => "chain_unavailable",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The orchestrator's answer to a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The operation is on its way. `tx_hash` is `None` only for a
    /// transfer whose effect was already visible on chain, in which case
    /// nothing new was broadcast.
    Accepted { tx_hash: Option<TxHash> },
    Rejected { reason: RejectReason },
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            Submission::Rejected { reason } => Some(*reason),
            Submission::Accepted { .. } => None,
        }
    }
}
