//! HTTP client for the name service's builder RPC.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use registrar_types::{ChainAddress, NameId, PrivateKey, PublicKey, RemoteError, SubsidizedTx};

use crate::traits::SubsidyBuilder;

/// Typed client for the name service.
#[derive(Clone)]
pub struct NameSvcClient {
    http: reqwest::Client,
    service_url: String,
}

impl NameSvcClient {
    pub fn new(
        service_url: impl Into<String>,
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
            service_url: service_url.into(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    async fn build_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<SubsidizedTx, RemoteError> {
        debug!(action, "requesting unsigned subsidized transaction");
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| RemoteError::Malformed("params must be a JSON object".into()))?
            .insert("action".to_string(), serde_json::json!(action));

        let response = self
            .http
            .post(&self.service_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout
                } else {
                    RemoteError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::Service(format!(
                "name service returned HTTP {}",
                response.status()
            )));
        }

        let reply: BuildReply = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(format!("invalid JSON response: {e}")))?;

        if let Some(err) = reply.error {
            return Err(RemoteError::Service(format!("name service error: {err}")));
        }

        // A success-shaped reply without the transaction payload is a
        // builder defect, not a success.
        let tx_hex = reply.subsidized_tx.ok_or_else(|| {
            RemoteError::Malformed("reply carries neither subsidized_tx nor error".into())
        })?;

        SubsidizedTx::from_hex(&tx_hex)
            .map_err(|e| RemoteError::Malformed(format!("undecodable subsidized_tx: {e}")))
    }
}

#[derive(Deserialize)]
struct BuildReply {
    #[serde(default)]
    subsidized_tx: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl SubsidyBuilder for NameSvcClient {
    async fn build_update(
        &self,
        name: &NameId,
        value_hash: &str,
        owner_public_key: &PublicKey,
        subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError> {
        self.build_call(
            "build_update_tx",
            serde_json::json!({
                "name": name.as_str(),
                "value_hash": value_hash,
                "owner_public_key": owner_public_key.to_hex(),
                "subsidy_key": subsidy_key.to_hex(),
            }),
        )
        .await
    }

    async fn build_transfer(
        &self,
        name: &NameId,
        recipient: &ChainAddress,
        keep_data: bool,
        owner_public_key: &PublicKey,
        subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError> {
        self.build_call(
            "build_transfer_tx",
            serde_json::json!({
                "name": name.as_str(),
                "recipient": recipient.as_str(),
                "keep_data": keep_data,
                "owner_public_key": owner_public_key.to_hex(),
                "subsidy_key": subsidy_key.to_hex(),
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_crypto::generate_keypair;
    use registrar_types::{OpPayload, PublicKey, TxHash, TxInput};

    fn sample_tx_hex() -> String {
        SubsidizedTx {
            inputs: vec![TxInput {
                prev_tx: TxHash::new([1u8; 32]),
                prev_index: 0,
                public_key: PublicKey([2u8; 32]),
                signature: None,
            }],
            outputs: vec![],
            payload: OpPayload::Update {
                name: NameId::new("alice.id"),
                value_hash: "ab".into(),
            },
        }
        .to_hex()
    }

    fn client_for(server: &mockito::ServerGuard) -> NameSvcClient {
        NameSvcClient::new(
            server.url(),
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn build_update_decodes_transaction() {
        let mut server = mockito::Server::new_async().await;
        let body = format!(r#"{{"subsidized_tx": "{}"}}"#, sample_tx_hex());
        let _m = server.mock("POST", "/").with_body(body).create_async().await;

        let kp = generate_keypair();
        let tx = client_for(&server)
            .build_update(&NameId::new("alice.id"), "ab", &kp.public, &kp.private)
            .await
            .unwrap();
        assert_eq!(tx.unsigned_input_count(), 1);
    }

    #[tokio::test]
    async fn missing_payload_field_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"something_else": true}"#)
            .create_async()
            .await;

        let kp = generate_keypair();
        let err = client_for(&server)
            .build_update(&NameId::new("alice.id"), "ab", &kp.public, &kp.private)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[tokio::test]
    async fn service_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"error": "name has no zonefile"}"#)
            .create_async()
            .await;

        let kp = generate_keypair();
        let err = client_for(&server)
            .build_transfer(
                &NameId::new("alice.id"),
                &ChainAddress::new("id_bob"),
                true,
                &kp.public,
                &kp.private,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Service(_)));
    }

    #[tokio::test]
    async fn undecodable_tx_hex_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"subsidized_tx": "zzzz"}"#)
            .create_async()
            .await;

        let kp = generate_keypair();
        let err = client_for(&server)
            .build_update(&NameId::new("alice.id"), "ab", &kp.public, &kp.private)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }
}
