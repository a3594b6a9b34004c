//! Fundamental types for the registrar.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: names, addresses, hashes, keys, operation requests, the
//! subsidized transaction model, and the remote-collaborator error taxonomy.

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod name;
pub mod operation;
pub mod transaction;

pub use address::ChainAddress;
pub use error::RemoteError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use name::{NameId, NameRecord};
pub use operation::{NameOperation, OperationKind, SubmitRequest};
pub use transaction::{OpPayload, SubsidizedTx, TxCodecError, TxInput, TxOutput};
