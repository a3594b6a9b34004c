//! Chain address newtype.
//!
//! Addresses are `id_`-prefixed base32 strings derived from Ed25519 public
//! keys. Derivation and checksum verification live in `registrar-crypto`;
//! this type only carries the string and its format-level shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every identity-chain address.
pub const ADDRESS_PREFIX: &str = "id_";
/// Base32 characters encoding the 32-byte public key (ceil(256 / 5)).
pub const PUBKEY_CHARS: usize = 52;
/// Base32 characters encoding the 4-byte checksum (ceil(32 / 5)).
pub const CHECKSUM_CHARS: usize = 7;

/// An address on the identity chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAddress(String);

impl ChainAddress {
    /// Wrap a string as an address without verifying the checksum.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cheap shape check: prefix and encoded length. Full checksum
    /// verification is `registrar_crypto::validate_address`.
    pub fn looks_well_formed(&self) -> bool {
        self.0.strip_prefix(ADDRESS_PREFIX).map(str::len) == Some(PUBKEY_CHARS + CHECKSUM_CHARS)
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_check_requires_prefix_and_length() {
        let good = ChainAddress::new(format!("id_{}", "1".repeat(PUBKEY_CHARS + CHECKSUM_CHARS)));
        assert!(good.looks_well_formed());
        assert!(!ChainAddress::new("id_short").looks_well_formed());
        assert!(!ChainAddress::new("xx_11111").looks_well_formed());
    }
}
