//! Transaction broker: co-sign and broadcast.

use thiserror::Error;
use tracing::{debug, warn};

use registrar_chain::TxBroadcaster;
use registrar_crypto::sign_unsigned_inputs;
use registrar_types::{PrivateKey, RemoteError, SubsidizedTx, TxHash};

#[derive(Debug, Error)]
pub enum BrokerError {
    /// The node answered without a transaction hash.
    #[error("broadcast rejected: {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected { detail: Option<String> },

    /// The transport or service call itself failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The node returned a hash that does not parse.
    #[error("invalid transaction hash in broadcast reply: {0}")]
    InvalidHash(String),
}

/// Sign every unsigned input of `tx` with the owner key (the payer's
/// signature is already embedded by the remote builder), then submit the
/// raw transaction.
///
/// Success requires the typed reply to carry a transaction hash; a reply
/// without one is a failure even when the call itself succeeded, and the
/// raw reply is logged for diagnosis.
pub async fn cosign_and_broadcast(
    owner_key: &PrivateKey,
    mut tx: SubsidizedTx,
    chain: &dyn TxBroadcaster,
) -> Result<TxHash, BrokerError> {
    let signed = sign_unsigned_inputs(&mut tx, owner_key);
    debug!(inputs_signed = signed, "co-signed subsidized transaction");

    let raw = tx.to_hex();
    let reply = chain.broadcast(&raw).await?;

    match reply.tx_hash {
        Some(ref hash) => {
            TxHash::from_hex(hash).ok_or_else(|| BrokerError::InvalidHash(hash.clone()))
        }
        None => {
            warn!(reply = ?reply, "broadcast reply carries no transaction hash");
            Err(BrokerError::Rejected {
                detail: reply.detail,
            })
        }
    }
}
