//! Trait seams between the orchestrator and the chain.
//!
//! Each call reflects chain/mempool state at call time; the window between
//! a check and the eventual broadcast is accepted, with broadcast failure
//! as the final backstop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use registrar_types::{ChainAddress, NameId, NameRecord, RemoteError};

/// Read access to on-chain name state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The record for `name`, or `None` if the name is not registered.
    async fn name_record(&self, name: &NameId) -> Result<Option<NameRecord>, RemoteError>;
}

/// The chain node's answer to a broadcast. An accepted transaction always
/// carries `tx_hash`; a missing hash is a failure even when the transport
/// call itself succeeded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BroadcastResult {
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Raw-transaction submission.
#[async_trait]
pub trait TxBroadcaster: Send + Sync {
    async fn broadcast(&self, raw_tx_hex: &str) -> Result<BroadcastResult, RemoteError>;
}

/// Health questions about payment and recipient addresses.
#[async_trait]
pub trait AddressOracle: Send + Sync {
    /// The address has in-flight activity and must not fund a new
    /// transaction (its spendable outputs may already be consumed).
    async fn dont_use(&self, address: &ChainAddress) -> Result<bool, RemoteError>;

    /// The address cannot cover a transaction fee.
    async fn underfunded(&self, address: &ChainAddress) -> Result<bool, RemoteError>;

    /// The candidate recipient is not eligible to receive another name.
    async fn recipient_not_ready(&self, address: &ChainAddress) -> Result<bool, RemoteError>;
}
