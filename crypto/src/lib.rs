//! Cryptographic primitives for the registrar.
//!
//! Ed25519 key handling and signing, Blake2b-256 hashing, chain address
//! derivation, and co-signing of unsigned subsidized-transaction inputs.

pub mod address;
pub mod cosign;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{address_from_private, decode_address, derive_address, validate_address};
pub use cosign::sign_unsigned_inputs;
pub use hash::{blake2b_256, profile_hash};
pub use keys::{generate_keypair, keypair_from_private, public_from_private};
pub use sign::{sign_message, verify_signature};
