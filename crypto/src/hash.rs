//! Blake2b-256 hashing.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// Hash arbitrary bytes with Blake2b-256.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a profile document to the value hash recorded on chain.
///
/// The chain never sees the profile body, only this hex digest of its
/// JSON serialization.
pub fn profile_hash(profile: &serde_json::Value) -> String {
    let serialized = profile.to_string();
    let digest = blake2b_256(serialized.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(blake2b_256(b"abc"), blake2b_256(b"abc"));
        assert_ne!(blake2b_256(b"abc"), blake2b_256(b"abd"));
    }

    #[test]
    fn profile_hash_is_hex_of_32_bytes() {
        let profile = serde_json::json!({ "name": "alice", "bio": "hello" });
        let h = profile_hash(&profile);
        assert_eq!(h.len(), 64);
        assert!(h.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn different_profiles_hash_differently() {
        let a = serde_json::json!({ "v": 1 });
        let b = serde_json::json!({ "v": 2 });
        assert_ne!(profile_hash(&a), profile_hash(&b));
    }
}
