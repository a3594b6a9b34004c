//! The subsidized transaction model.
//!
//! A subsidized transaction carries two parties: the payer's inputs arrive
//! from the remote builder already signed (they authorized the fee), the
//! owner's inputs arrive unsigned and are co-signed locally before
//! broadcast. Wire form is hex-encoded bincode.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ChainAddress, NameId, PublicKey, Signature, TxHash};

#[derive(Debug, Error)]
pub enum TxCodecError {
    #[error("invalid transaction hex: {0}")]
    Hex(String),

    #[error("undecodable transaction payload: {0}")]
    Decode(String),
}

/// One spendable input. `signature` is `None` until the holder of
/// `public_key` signs the transaction digest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxInput {
    pub prev_tx: TxHash,
    pub prev_index: u32,
    pub public_key: PublicKey,
    pub signature: Option<Signature>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: ChainAddress,
    pub amount: u128,
}

/// The name operation carried by the transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpPayload {
    Update {
        name: NameId,
        value_hash: String,
    },
    Transfer {
        name: NameId,
        recipient: ChainAddress,
        keep_data: bool,
    },
}

/// A subsidized name-operation transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubsidizedTx {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub payload: OpPayload,
}

impl SubsidizedTx {
    /// Digest every signer commits to: the transaction with all signatures
    /// stripped, so the payer's and owner's signatures cover the same bytes.
    pub fn signing_digest(&self) -> [u8; 32] {
        let mut stripped = self.clone();
        for input in &mut stripped.inputs {
            input.signature = None;
        }
        let bytes = bincode::serialize(&stripped)
            .expect("in-memory transaction always bincode-serializable");
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(&bytes);
        hasher.finalize().into()
    }

    pub fn unsigned_input_count(&self) -> usize {
        self.inputs.iter().filter(|i| i.signature.is_none()).count()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.unsigned_input_count() == 0
    }

    /// Encode to the raw wire form accepted by `broadcast_transaction`.
    pub fn to_hex(&self) -> String {
        let bytes =
            bincode::serialize(self).expect("in-memory transaction always bincode-serializable");
        hex::encode(bytes)
    }

    /// Decode the wire form produced by the remote builder.
    pub fn from_hex(s: &str) -> Result<Self, TxCodecError> {
        let bytes = hex::decode(s).map_err(|e| TxCodecError::Hex(e.to_string()))?;
        bincode::deserialize(&bytes).map_err(|e| TxCodecError::Decode(e.to_string()))
    }
}
