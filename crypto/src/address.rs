//! Chain address derivation.
//!
//! An address is `id_` + base32(public_key) + base32(checksum), where the
//! checksum is the first 4 bytes of Blake2b-256(public_key). The base32
//! alphabet is lowercase RFC 4648 (`a-z2-7`), no padding.

use registrar_types::address::{ADDRESS_PREFIX, CHECKSUM_CHARS, PUBKEY_CHARS};
use registrar_types::{ChainAddress, PrivateKey, PublicKey};

use crate::hash::blake2b_256;
use crate::keys::public_from_private;

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Bytes of Blake2b-256(public key) used as checksum.
const CHECKSUM_BYTES: usize = 4;

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut acc: u32 = 0;
    let mut acc_bits = 0u32;
    for &byte in bytes {
        acc = (acc << 8) | u32::from(byte);
        acc_bits += 8;
        while acc_bits >= 5 {
            acc_bits -= 5;
            out.push(ALPHABET[(acc >> acc_bits) as usize & 0x1F]);
        }
    }
    if acc_bits > 0 {
        out.push(ALPHABET[(acc << (5 - acc_bits)) as usize & 0x1F]);
    }
    String::from_utf8(out).expect("alphabet is ASCII")
}

fn decode_base32(s: &str, expected_len: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut acc: u32 = 0;
    let mut acc_bits = 0u32;
    for c in s.bytes() {
        let val = match c {
            b'a'..=b'z' => c - b'a',
            b'2'..=b'7' => c - b'2' + 26,
            _ => return None,
        };
        acc = (acc << 5) | u32::from(val);
        acc_bits += 5;
        if acc_bits >= 8 {
            acc_bits -= 8;
            if out.len() < expected_len {
                out.push((acc >> acc_bits) as u8);
            }
        }
    }
    (out.len() == expected_len).then_some(out)
}

/// Derive the chain address of a public key.
pub fn derive_address(public_key: &PublicKey) -> ChainAddress {
    let checksum = &blake2b_256(public_key.as_bytes())[..CHECKSUM_BYTES];
    let encoded = format!(
        "{}{}{}",
        ADDRESS_PREFIX,
        encode_base32(public_key.as_bytes()),
        encode_base32(checksum)
    );
    ChainAddress::new(encoded)
}

/// Derive the chain address controlled by a private key. This is the
/// ownership-proof primitive: the result is compared against the name's
/// on-chain owner address.
pub fn address_from_private(private_key: &PrivateKey) -> ChainAddress {
    derive_address(&public_from_private(private_key))
}

/// Recover the public key bytes from an address, verifying the checksum.
pub fn decode_address(address: &ChainAddress) -> Option<[u8; 32]> {
    let encoded = address.as_str().strip_prefix(ADDRESS_PREFIX)?;
    if encoded.len() != PUBKEY_CHARS + CHECKSUM_CHARS {
        return None;
    }
    let pubkey = decode_base32(&encoded[..PUBKEY_CHARS], 32)?;
    let checksum = decode_base32(&encoded[PUBKEY_CHARS..], CHECKSUM_BYTES)?;
    let pubkey: [u8; 32] = pubkey.try_into().ok()?;
    (blake2b_256(&pubkey)[..CHECKSUM_BYTES] == checksum[..]).then_some(pubkey)
}

/// Whether an address string is well-formed with a valid checksum.
pub fn validate_address(address: &ChainAddress) -> bool {
    decode_address(address).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;

    #[test]
    fn derive_and_validate() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("id_"));
        assert!(addr.looks_well_formed());
        assert!(validate_address(&addr));
    }

    #[test]
    fn decode_recovers_public_key() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert_eq!(decode_address(&addr), Some(*kp.public.as_bytes()));
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let kp = generate_keypair();
        let mut s = derive_address(&kp.public).as_str().to_string();
        let last = s.pop().unwrap();
        s.push(if last == 'a' { 'b' } else { 'a' });
        assert!(!validate_address(&ChainAddress::new(s)));
    }

    #[test]
    fn wrong_prefix_rejected() {
        assert!(!validate_address(&ChainAddress::new("nc_aaaa")));
        assert!(!validate_address(&ChainAddress::new("id_tooshort")));
    }

    #[test]
    fn address_from_private_matches_public_derivation() {
        let kp = generate_keypair();
        assert_eq!(address_from_private(&kp.private), derive_address(&kp.public));
    }

    #[test]
    fn distinct_keys_distinct_addresses() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(derive_address(&a.public), derive_address(&b.public));
    }
}
