//! Address-to-key resolution.

use std::collections::HashMap;
use std::path::Path;

use registrar_crypto::derive_address;
use registrar_types::{ChainAddress, KeyPair, PrivateKey};
use tracing::info;

use crate::error::WalletError;
use crate::keystore::{decrypt_entry, KeystoreFile};

/// Resolves a payment address to its private key.
///
/// The orchestrator consults this when a submission does not carry the
/// payment key itself.
pub trait KeyResolver: Send + Sync {
    fn resolve_key(&self, address: &ChainAddress) -> Option<PrivateKey>;
}

/// The registrar's payment wallet: an in-memory map of decrypted keys.
pub struct Wallet {
    keys: HashMap<String, [u8; 32]>,
}

impl Wallet {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Load and decrypt a keystore file, verifying that every entry's key
    /// actually derives the address it claims.
    pub fn load(path: &Path, password: &str) -> Result<Self, WalletError> {
        let file = KeystoreFile::load(path)?;
        let mut keys = HashMap::new();
        for entry in &file.entries {
            let secret = decrypt_entry(entry, password)?;
            let derived = derive_address(&registrar_crypto::public_from_private(&PrivateKey(
                secret,
            )));
            if derived.as_str() != entry.address {
                return Err(WalletError::AddressMismatch {
                    address: entry.address.clone(),
                });
            }
            keys.insert(entry.address.clone(), secret);
        }
        info!(entries = keys.len(), "wallet keystore loaded");
        Ok(Self { keys })
    }

    /// Register a key pair directly (tooling and tests).
    pub fn insert(&mut self, pair: &KeyPair) {
        let address = derive_address(&pair.public);
        self.keys.insert(address.as_str().to_string(), pair.private.0);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyResolver for Wallet {
    fn resolve_key(&self, address: &ChainAddress) -> Option<PrivateKey> {
        self.keys.get(address.as_str()).map(|bytes| PrivateKey(*bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::encrypt_entry;
    use registrar_crypto::generate_keypair;

    #[test]
    fn insert_then_resolve() {
        let kp = generate_keypair();
        let address = derive_address(&kp.public);
        let mut wallet = Wallet::new();
        wallet.insert(&kp);

        let resolved = wallet.resolve_key(&address).unwrap();
        assert_eq!(resolved.0, kp.private.0);
    }

    #[test]
    fn unknown_address_resolves_to_none() {
        let wallet = Wallet::new();
        assert!(wallet.resolve_key(&ChainAddress::new("id_ghost")).is_none());
    }

    #[test]
    fn load_verifies_derived_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");

        let kp = generate_keypair();
        let address = derive_address(&kp.public);
        let mut file = KeystoreFile::empty();
        file.entries
            .push(encrypt_entry(address.as_str(), &kp.private.0, "pw").unwrap());
        file.save(&path).unwrap();

        let wallet = Wallet::load(&path, "pw").unwrap();
        assert_eq!(wallet.len(), 1);
        assert!(wallet.resolve_key(&address).is_some());
    }

    #[test]
    fn load_rejects_mismatched_entry_address() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");

        let kp = generate_keypair();
        let mut file = KeystoreFile::empty();
        file.entries
            .push(encrypt_entry("id_not_this_key", &kp.private.0, "pw").unwrap());
        file.save(&path).unwrap();

        assert!(matches!(
            Wallet::load(&path, "pw"),
            Err(WalletError::AddressMismatch { .. })
        ));
    }
}
