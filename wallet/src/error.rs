use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key error: {0}")]
    Key(String),

    #[error("keystore file error: {0}")]
    File(String),

    #[error("keystore entry for {address} decrypts to a key for a different address")]
    AddressMismatch { address: String },

    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),
}
