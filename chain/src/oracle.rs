//! Funding oracle: interprets raw chain queries against configured
//! thresholds.
//!
//! Stateless: every answer reflects chain and mempool state at
//! call time.

use async_trait::async_trait;

use registrar_types::{ChainAddress, RemoteError};

use crate::client::ChainClient;
use crate::traits::AddressOracle;

/// Thresholds the oracle judges addresses against.
#[derive(Clone, Copy, Debug)]
pub struct OracleThresholds {
    /// Minimum balance (base units) a payment address must hold.
    pub funding_threshold: u128,
    /// Maximum names a recipient may already own and still receive one.
    pub max_recipient_names: usize,
}

impl Default for OracleThresholds {
    fn default() -> Self {
        Self {
            funding_threshold: 100_000,
            max_recipient_names: 25,
        }
    }
}

/// [`AddressOracle`] backed by the chain node.
pub struct FundingOracle {
    client: ChainClient,
    thresholds: OracleThresholds,
}

impl FundingOracle {
    pub fn new(client: ChainClient, thresholds: OracleThresholds) -> Self {
        Self { client, thresholds }
    }
}

#[async_trait]
impl AddressOracle for FundingOracle {
    async fn dont_use(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        // Any unconfirmed activity means spendable outputs may already be
        // committed elsewhere.
        let unconfirmed = self.client.address_unconfirmed(address).await?;
        Ok(unconfirmed > 0)
    }

    async fn underfunded(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        let balance = self.client.address_balance(address).await?;
        Ok(balance < self.thresholds.funding_threshold)
    }

    async fn recipient_not_ready(&self, address: &ChainAddress) -> Result<bool, RemoteError> {
        let names = self.client.names_owned_by(address).await?;
        Ok(names.len() >= self.thresholds.max_recipient_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn oracle_for(server: &mockito::ServerGuard, thresholds: OracleThresholds) -> FundingOracle {
        let client = ChainClient::new(
            server.url(),
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap();
        FundingOracle::new(client, thresholds)
    }

    #[tokio::test]
    async fn pending_activity_flags_dont_use() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"result": {"unconfirmed": 2}}"#)
            .create_async()
            .await;

        let oracle = oracle_for(&server, OracleThresholds::default());
        assert!(oracle.dont_use(&ChainAddress::new("id_pay")).await.unwrap());
    }

    #[tokio::test]
    async fn balance_below_threshold_is_underfunded() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"result": {"balance": "999"}}"#)
            .create_async()
            .await;

        let oracle = oracle_for(
            &server,
            OracleThresholds {
                funding_threshold: 1_000,
                max_recipient_names: 25,
            },
        );
        assert!(oracle
            .underfunded(&ChainAddress::new("id_pay"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn recipient_at_cap_is_not_ready() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_body(r#"{"result": {"names": ["a.id", "b.id"]}}"#)
            .create_async()
            .await;

        let oracle = oracle_for(
            &server,
            OracleThresholds {
                funding_threshold: 1,
                max_recipient_names: 2,
            },
        );
        assert!(oracle
            .recipient_not_ready(&ChainAddress::new("id_bob"))
            .await
            .unwrap());
    }
}
