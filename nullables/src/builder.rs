//! Nullable subsidy builder: returns a canned transaction shaped like
//! the real service's output (payer input signed, owner input not).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use registrar_namesvc::SubsidyBuilder;
use registrar_types::{
    ChainAddress, NameId, OpPayload, PrivateKey, PublicKey, RemoteError, Signature, SubsidizedTx,
    TxHash, TxInput, TxOutput,
};

#[derive(Default)]
pub struct NullSubsidyBuilder {
    error: Mutex<Option<RemoteError>>,
    pub build_calls: AtomicUsize,
}

impl NullSubsidyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a failure for the next build call.
    pub fn set_error(&self, error: RemoteError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn build_count(&self) -> usize {
        self.build_calls.load(Ordering::Relaxed)
    }

    fn build(&self, owner_public_key: &PublicKey, payload: OpPayload) -> Result<SubsidizedTx, RemoteError> {
        self.build_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(SubsidizedTx {
            inputs: vec![
                // Owner input, left for local co-signing.
                TxInput {
                    prev_tx: TxHash::new([1u8; 32]),
                    prev_index: 0,
                    public_key: owner_public_key.clone(),
                    signature: None,
                },
                // Payer input, already signed by the service.
                TxInput {
                    prev_tx: TxHash::new([2u8; 32]),
                    prev_index: 0,
                    public_key: PublicKey([9u8; 32]),
                    signature: Some(Signature([7u8; 64])),
                },
            ],
            outputs: vec![TxOutput {
                address: ChainAddress::new("id_change"),
                amount: 0,
            }],
            payload,
        })
    }
}

#[async_trait]
impl SubsidyBuilder for NullSubsidyBuilder {
    async fn build_update(
        &self,
        name: &NameId,
        value_hash: &str,
        owner_public_key: &PublicKey,
        _subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError> {
        self.build(
            owner_public_key,
            OpPayload::Update {
                name: name.clone(),
                value_hash: value_hash.to_string(),
            },
        )
    }

    async fn build_transfer(
        &self,
        name: &NameId,
        recipient: &ChainAddress,
        keep_data: bool,
        owner_public_key: &PublicKey,
        _subsidy_key: &PrivateKey,
    ) -> Result<SubsidizedTx, RemoteError> {
        self.build(
            owner_public_key,
            OpPayload::Transfer {
                name: name.clone(),
                recipient: recipient.clone(),
                keep_data,
            },
        )
    }
}
