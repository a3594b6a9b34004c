//! HTTP client for the identity-chain node.
//!
//! Speaks the node's JSON "action" protocol: every request is a POST with
//! an `action` field plus parameters, every response either a `result`
//! object or an `error` string.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use registrar_types::{ChainAddress, NameId, NameRecord, RemoteError};

use crate::traits::{BroadcastResult, ChainReader, TxBroadcaster};

/// Typed client for the chain node RPC.
#[derive(Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    node_url: String,
}

impl ChainClient {
    /// Create a client targeting `node_url` with explicit connect and
    /// request timeouts.
    pub fn new(
        node_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| RemoteError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send one action request and return its `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RemoteError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| RemoteError::Malformed("params must be a JSON object".into()))?
            .insert("action".to_string(), serde_json::json!(action));

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(RemoteError::Service(format!(
                "chain node returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            return Err(RemoteError::Service(format!("chain node error: {err}")));
        }

        Ok(json.get("result").cloned().unwrap_or(json))
    }

    /// Balance of an address, in base units.
    pub async fn address_balance(&self, address: &ChainAddress) -> Result<u128, RemoteError> {
        let result = self
            .rpc_call(
                "address_balance",
                serde_json::json!({ "address": address.as_str() }),
            )
            .await?;
        let parsed: BalanceResult = from_result(result)?;
        parsed
            .balance
            .parse::<u128>()
            .map_err(|e| RemoteError::Malformed(format!("invalid balance value: {e}")))
    }

    /// Number of unconfirmed transactions touching an address.
    pub async fn address_unconfirmed(&self, address: &ChainAddress) -> Result<u64, RemoteError> {
        let result = self
            .rpc_call(
                "address_unconfirmed",
                serde_json::json!({ "address": address.as_str() }),
            )
            .await?;
        let parsed: UnconfirmedResult = from_result(result)?;
        Ok(parsed.unconfirmed)
    }

    /// Names currently owned by an address.
    pub async fn names_owned_by(
        &self,
        address: &ChainAddress,
    ) -> Result<Vec<String>, RemoteError> {
        let result = self
            .rpc_call(
                "names_owned_by",
                serde_json::json!({ "address": address.as_str() }),
            )
            .await?;
        let parsed: OwnedNamesResult = from_result(result)?;
        Ok(parsed.names)
    }

    /// Confirmation depth of a broadcast transaction. Consumed by the
    /// external confirmation monitor rather than the submission pipeline.
    pub async fn tx_confirmations(&self, tx_hash: &str) -> Result<u64, RemoteError> {
        let result = self
            .rpc_call("tx_confirmations", serde_json::json!({ "tx": tx_hash }))
            .await?;
        let parsed: ConfirmationsResult = from_result(result)?;
        Ok(parsed.confirmations)
    }
}

#[async_trait]
impl ChainReader for ChainClient {
    async fn name_record(&self, name: &NameId) -> Result<Option<NameRecord>, RemoteError> {
        let result = self
            .rpc_call("name_record", serde_json::json!({ "name": name.as_str() }))
            .await?;
        let parsed: NameRecordResult = from_result(result)?;
        Ok(parsed.record)
    }
}

#[async_trait]
impl TxBroadcaster for ChainClient {
    async fn broadcast(&self, raw_tx_hex: &str) -> Result<BroadcastResult, RemoteError> {
        debug!(bytes = raw_tx_hex.len() / 2, "broadcasting raw transaction");
        let result = self
            .rpc_call(
                "broadcast_transaction",
                serde_json::json!({ "tx": raw_tx_hex }),
            )
            .await?;
        from_result(result)
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(e.to_string())
    }
}

fn from_result<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, RemoteError> {
    serde_json::from_value(value)
        .map_err(|e| RemoteError::Malformed(format!("unexpected response shape: {e}")))
}

#[derive(Deserialize)]
struct NameRecordResult {
    #[serde(default)]
    record: Option<NameRecord>,
}

#[derive(Deserialize)]
struct BalanceResult {
    balance: String,
}

#[derive(Deserialize)]
struct UnconfirmedResult {
    unconfirmed: u64,
}

#[derive(Deserialize)]
struct OwnedNamesResult {
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Deserialize)]
struct ConfirmationsResult {
    confirmations: u64,
}
