//! Queue record model and storage trait.
//!
//! Each queue holds the accepted-but-not-yet-confirmed operations of one
//! lifecycle stage, keyed by name. At most one record per name per queue;
//! records are created only after a successful broadcast and are never
//! mutated afterwards; the external confirmation monitor removes them.

use registrar_types::{ChainAddress, NameId};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The four name-lifecycle queues. This orchestrator drives `Update` and
/// `Transfer`; preorder and register are populated by the registration path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Preorder,
    Register,
    Update,
    Transfer,
}

impl QueueKind {
    pub const ALL: [QueueKind; 4] = [
        QueueKind::Preorder,
        QueueKind::Register,
        QueueKind::Update,
        QueueKind::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Preorder => "preorder",
            QueueKind::Register => "register",
            QueueKind::Update => "update",
            QueueKind::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preorder" => Some(QueueKind::Preorder),
            "register" => Some(QueueKind::Register),
            "update" => Some(QueueKind::Update),
            "transfer" => Some(QueueKind::Transfer),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific fields of a queue record.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPayload {
    Preorder {
        payment_address: ChainAddress,
    },
    Register {
        payment_address: ChainAddress,
    },
    Update {
        /// The full profile document as canonical JSON text; the external
        /// monitor propagates it once the value hash confirms.
        profile: String,
        profile_hash: String,
    },
    Transfer {
        transfer_address: ChainAddress,
    },
}

impl RecordPayload {
    pub fn kind(&self) -> QueueKind {
        match self {
            RecordPayload::Preorder { .. } => QueueKind::Preorder,
            RecordPayload::Register { .. } => QueueKind::Register,
            RecordPayload::Update { .. } => QueueKind::Update,
            RecordPayload::Transfer { .. } => QueueKind::Transfer,
        }
    }
}

/// The persisted outcome of one broadcast operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueueRecord {
    /// Key within the queue.
    pub name: NameId,
    /// Hex hash of the broadcast transaction.
    pub tx_hash: String,
    /// Owner address at submission time.
    pub owner_address: ChainAddress,
    /// UNIX seconds at which the record was committed.
    pub queued_at: u64,
    pub payload: RecordPayload,
}

/// Keyed record store, one logical partition per [`QueueKind`].
///
/// `insert_new` is the conditional insert the orchestrator's idempotence
/// guarantee rests on: existence check and append must be atomic with
/// respect to concurrent inserts for the same name.
pub trait QueueStore: Send + Sync {
    /// Whether a record for `name` exists in `queue`.
    fn contains(&self, queue: QueueKind, name: &str) -> Result<bool, StoreError>;

    /// Append a record, failing with [`StoreError::Duplicate`] if one
    /// already exists for the same name. Check and write are atomic.
    fn insert_new(&self, queue: QueueKind, record: &QueueRecord) -> Result<(), StoreError>;

    /// Fetch the record for `name`, if any.
    fn get(&self, queue: QueueKind, name: &str) -> Result<Option<QueueRecord>, StoreError>;

    /// Remove a resolved record (confirmation monitor's path).
    fn remove(&self, queue: QueueKind, name: &str) -> Result<(), StoreError>;

    /// All records currently in `queue`.
    fn list(&self, queue: QueueKind) -> Result<Vec<QueueRecord>, StoreError>;

    /// Number of records in `queue`.
    fn count(&self, queue: QueueKind) -> Result<u64, StoreError>;
}
