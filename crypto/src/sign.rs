//! Ed25519 signing and verification.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use registrar_types::{PrivateKey, PublicKey, Signature};

/// Sign a message with a private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key. Returns `false`
/// for invalid keys as well as invalid signatures.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;

    #[test]
    fn sign_and_verify() {
        let kp = generate_keypair();
        let msg = b"subsidized name operation";
        let sig = sign_message(msg, &kp.private);
        assert!(verify_signature(msg, &sig, &kp.public));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = generate_keypair();
        let sig = sign_message(b"one", &kp.private);
        assert!(!verify_signature(b"two", &sig, &kp.public));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        let sig = sign_message(b"msg", &kp1.private);
        assert!(!verify_signature(b"msg", &sig, &kp2.public));
    }

    #[test]
    fn invalid_public_key_rejected() {
        let kp = generate_keypair();
        let sig = sign_message(b"msg", &kp.private);
        assert!(!verify_signature(b"msg", &sig, &PublicKey([0xFF; 32])));
    }
}
