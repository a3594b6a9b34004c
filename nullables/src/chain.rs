//! Nullable chain: scripted name records, oracle flags, and broadcast
//! replies, with call counters for observing guard order.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use registrar_chain::{AddressOracle, BroadcastResult, ChainReader, TxBroadcaster};
use registrar_types::{ChainAddress, NameId, NameRecord, RemoteError};

/// One configurable stand-in for the chain node: implements the reader,
/// broadcaster, and oracle seams against in-memory state.
#[derive(Default)]
pub struct NullChain {
    records: Mutex<HashMap<String, NameRecord>>,
    unusable: Mutex<HashSet<String>>,
    underfunded: Mutex<HashSet<String>>,
    not_ready: Mutex<HashSet<String>>,
    broadcast_reply: Mutex<Option<BroadcastResult>>,
    broadcast_error: Mutex<Option<RemoteError>>,
    pub broadcast_calls: AtomicUsize,
    pub oracle_calls: AtomicUsize,
}

impl NullChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name with the given owner.
    pub fn register_name(&self, name: &NameId, owner: &ChainAddress) {
        self.records.lock().unwrap().insert(
            name.as_str().to_string(),
            NameRecord {
                owner_address: owner.clone(),
                value_hash: None,
                registered_at: 1,
                expires_at: None,
            },
        );
    }

    pub fn flag_unusable(&self, address: &ChainAddress) {
        self.unusable
            .lock()
            .unwrap()
            .insert(address.as_str().to_string());
    }

    pub fn flag_underfunded(&self, address: &ChainAddress) {
        self.underfunded
            .lock()
            .unwrap()
            .insert(address.as_str().to_string());
    }

    pub fn flag_not_ready(&self, address: &ChainAddress) {
        self.not_ready
            .lock()
            .unwrap()
            .insert(address.as_str().to_string());
    }

    /// Script the reply to the next broadcasts.
    pub fn set_broadcast_reply(&self, reply: BroadcastResult) {
        *self.broadcast_reply.lock().unwrap() = Some(reply);
    }

    /// Script a transport-level broadcast failure.
    pub fn set_broadcast_error(&self, error: RemoteError) {
        *self.broadcast_error.lock().unwrap() = Some(error);
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcast_calls.load(Ordering::Relaxed)
    }

    pub fn oracle_count(&self) -> usize {
        self.oracle_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ChainReader for NullChain {
    async fn name_record(&self, name: &NameId) -> Result<Option<NameRecord>, RemoteError> {
        Ok(self.records.lock().unwrap().get(name.as_str()).cloned())
    }
}

#[async_trait]
impl TxBroadcaster for NullChain {
    async fn broadcast(&self, _raw_tx_hex: &str) -> Result<BroadcastResult, RemoteError> {
        self.broadcast_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self.broadcast_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self
            .broadcast_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(BroadcastResult {
                tx_hash: Some("ab".repeat(32)),
                detail: None,
            }))
    }
}

#[async_trait]
impl AddressOracle for NullChain {
    async fn dont_use(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        self.oracle_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.unusable.lock().unwrap().contains(address.as_str()))
    }

    async fn underfunded(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        self.oracle_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.underfunded.lock().unwrap().contains(address.as_str()))
    }

    async fn recipient_not_ready(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        self.oracle_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.not_ready.lock().unwrap().contains(address.as_str()))
    }
}
