//! Encrypted multi-entry keystore.
//!
//! One JSON file holds every payment key the registrar controls, each
//! entry independently encrypted under the same password:
//! 1. Argon2id derives a 32-byte key from password + per-entry salt
//! 2. AES-256-GCM encrypts the Ed25519 secret with a per-entry nonce
//! 3. Parameters are stored alongside for future decryption

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::WalletError;

const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;

pub const KEYSTORE_VERSION: u32 = 1;

/// Top-level keystore file, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub entries: Vec<KeystoreEntry>,
}

/// One encrypted key, tagged with the address it controls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreEntry {
    pub address: String,
    pub crypto: EntryCrypto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KeystoreFile {
    pub fn empty() -> Self {
        Self {
            version: KEYSTORE_VERSION,
            entries: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| WalletError::File(format!("failed to read {}: {e}", path.display())))?;
        let file: KeystoreFile = serde_json::from_str(&json)
            .map_err(|e| WalletError::File(format!("invalid keystore JSON: {e}")))?;
        if file.version != KEYSTORE_VERSION {
            return Err(WalletError::UnsupportedVersion(file.version));
        }
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::File(format!("JSON serialization failed: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| WalletError::File(format!("failed to write {}: {e}", path.display())))
    }
}

/// Encrypt one secret key into a keystore entry.
pub fn encrypt_entry(
    address: &str,
    secret_key: &[u8; 32],
    password: &str,
) -> Result<KeystoreEntry, WalletError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&derived)
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), secret_key.as_ref())
        .map_err(|e| WalletError::Key(format!("encryption failed: {e}")))?;

    Ok(KeystoreEntry {
        address: address.to_string(),
        crypto: EntryCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: KdfParams {
                memory: ARGON2_MEMORY_KIB,
                iterations: ARGON2_ITERATIONS,
                parallelism: ARGON2_PARALLELISM,
            },
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(&ciphertext),
        },
    })
}

/// Decrypt one keystore entry back to its 32-byte secret key.
pub fn decrypt_entry(entry: &KeystoreEntry, password: &str) -> Result<[u8; 32], WalletError> {
    let salt = hex::decode(&entry.crypto.salt)
        .map_err(|e| WalletError::Key(format!("invalid salt hex: {e}")))?;
    let nonce_bytes = hex::decode(&entry.crypto.nonce)
        .map_err(|e| WalletError::Key(format!("invalid nonce hex: {e}")))?;
    let ciphertext = hex::decode(&entry.crypto.ciphertext)
        .map_err(|e| WalletError::Key(format!("invalid ciphertext hex: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Key(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&derived)
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| WalletError::Key("decryption failed: wrong password or corrupted data".into()))?;

    let key: [u8; 32] = plaintext
        .try_into()
        .map_err(|v: Vec<u8>| WalletError::Key(format!("decrypted key has length {}", v.len())))?;
    Ok(key)
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], WalletError> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, Some(32))
        .map_err(|e| WalletError::Key(format!("Argon2 params error: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| WalletError::Key(format!("Argon2 hashing failed: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_roundtrip() {
        let entry = encrypt_entry("id_pay", &[42u8; 32], "hunter2").unwrap();
        assert_eq!(decrypt_entry(&entry, "hunter2").unwrap(), [42u8; 32]);
    }

    #[test]
    fn wrong_password_fails() {
        let entry = encrypt_entry("id_pay", &[42u8; 32], "correct").unwrap();
        assert!(decrypt_entry(&entry, "wrong").is_err());
    }

    #[test]
    fn entries_use_fresh_salts() {
        let e1 = encrypt_entry("id_a", &[7u8; 32], "pw").unwrap();
        let e2 = encrypt_entry("id_b", &[7u8; 32], "pw").unwrap();
        assert_ne!(e1.crypto.salt, e2.crypto.salt);
        assert_ne!(e1.crypto.ciphertext, e2.crypto.ciphertext);
    }

    #[test]
    fn file_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");

        let mut file = KeystoreFile::empty();
        file.entries
            .push(encrypt_entry("id_pay", &[9u8; 32], "pw").unwrap());
        file.save(&path).unwrap();

        let loaded = KeystoreFile::load(&path).unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(decrypt_entry(&loaded.entries[0], "pw").unwrap(), [9u8; 32]);
    }

    #[test]
    fn unsupported_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");
        std::fs::write(&path, r#"{"version": 99, "entries": []}"#).unwrap();
        assert!(matches!(
            KeystoreFile::load(&path),
            Err(WalletError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(KeystoreFile::load(Path::new("/nonexistent/keystore.json")).is_err());
    }
}
