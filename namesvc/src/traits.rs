//! The subsidized-transaction builder seam.

use async_trait::async_trait;

use registrar_types::{ChainAddress, NameId, PrivateKey, PublicKey, RemoteError, SubsidizedTx};

/// Builds unsigned subsidized transactions for name operations.
///
/// The subsidy key is the payment private key, passed through as the
/// subsidy signer hint; the returned transaction's payer inputs arrive
/// already signed.
#[async_trait]
pub trait SubsidyBuilder: Send + Sync {
    async fn build_update(
        &self,
        name: &NameId,
        value_hash: &str,
        owner_public_key: &PublicKey,
        subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError>;

    async fn build_transfer(
        &self,
        name: &NameId,
        recipient: &ChainAddress,
        keep_data: bool,
        owner_public_key: &PublicKey,
        subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError>;
}
