//! Payment key wallet.
//!
//! Holds the private keys of the payment addresses the registrar may
//! subsidize from, loaded from an encrypted keystore file, and resolves
//! an address to its key on demand.

pub mod error;
pub mod keystore;
pub mod wallet;

pub use error::WalletError;
pub use keystore::{KeystoreEntry, KeystoreFile};
pub use wallet::{KeyResolver, Wallet};
