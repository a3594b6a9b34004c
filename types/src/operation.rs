//! Name operation requests submitted to the orchestrator.

use serde::{Deserialize, Serialize};

use crate::{ChainAddress, NameId, PrivateKey};

/// The two operation kinds this orchestrator drives. Preorder and register
/// exist in the queue store but are submitted through a different path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Update,
    Transfer,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Update => "update",
            OperationKind::Transfer => "transfer",
        }
    }
}

/// A name operation and its kind-specific payload.
#[derive(Clone, Debug)]
pub enum NameOperation {
    /// Rebind the name's data: the hash of `profile` goes on chain.
    Update {
        name: NameId,
        profile: serde_json::Value,
    },
    /// Hand the name to a new owner address.
    Transfer {
        name: NameId,
        recipient: ChainAddress,
    },
}

impl NameOperation {
    pub fn name(&self) -> &NameId {
        match self {
            NameOperation::Update { name, .. } => name,
            NameOperation::Transfer { name, .. } => name,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            NameOperation::Update { .. } => OperationKind::Update,
            NameOperation::Transfer { .. } => OperationKind::Transfer,
        }
    }
}

/// A full submission request: the operation, proof of ownership, and the
/// subsidizing payment address.
pub struct SubmitRequest {
    pub operation: NameOperation,
    /// Private key of the current owner; signs the operation inputs.
    pub owner_key: PrivateKey,
    /// Address covering the transaction fee.
    pub payment_address: ChainAddress,
    /// Payment key, if the caller already holds it. Resolved through the
    /// wallet otherwise.
    pub payment_key: Option<PrivateKey>,
}
