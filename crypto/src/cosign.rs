//! Co-signing of unsigned subsidized-transaction inputs.
//!
//! The remote builder returns a transaction whose payer inputs are signed
//! and whose owner inputs are not. The owner co-signs every remaining
//! unsigned input over the shared signing digest.

use registrar_types::{PrivateKey, SubsidizedTx};

use crate::sign::sign_message;

/// Sign every unsigned input of `tx` with `key`, leaving already-signed
/// inputs untouched. Returns the number of inputs signed.
pub fn sign_unsigned_inputs(tx: &mut SubsidizedTx, key: &PrivateKey) -> usize {
    let digest = tx.signing_digest();
    let signature = sign_message(&digest, key);
    let mut signed = 0;
    for input in tx.inputs.iter_mut().filter(|i| i.signature.is_none()) {
        input.signature = Some(signature.clone());
        signed += 1;
    }
    signed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;
    use crate::sign::verify_signature;
    use registrar_types::{
        ChainAddress, NameId, OpPayload, PublicKey, Signature, TxHash, TxInput, TxOutput,
    };

    fn two_input_tx(owner_pub: PublicKey) -> SubsidizedTx {
        SubsidizedTx {
            inputs: vec![
                TxInput {
                    prev_tx: TxHash::new([1u8; 32]),
                    prev_index: 0,
                    public_key: owner_pub,
                    signature: None,
                },
                TxInput {
                    prev_tx: TxHash::new([2u8; 32]),
                    prev_index: 0,
                    public_key: PublicKey([7u8; 32]),
                    signature: Some(Signature([8u8; 64])),
                },
            ],
            outputs: vec![TxOutput {
                address: ChainAddress::new("id_change"),
                amount: 1,
            }],
            payload: OpPayload::Update {
                name: NameId::new("alice.id"),
                value_hash: "aa".into(),
            },
        }
    }

    #[test]
    fn signs_only_unsigned_inputs() {
        let kp = generate_keypair();
        let mut tx = two_input_tx(kp.public.clone());
        let payer_sig = tx.inputs[1].signature.clone();

        let signed = sign_unsigned_inputs(&mut tx, &kp.private);

        assert_eq!(signed, 1);
        assert!(tx.is_fully_signed());
        // The embedded payer signature survives untouched.
        assert_eq!(tx.inputs[1].signature, payer_sig);
    }

    #[test]
    fn produced_signature_verifies_over_digest() {
        let kp = generate_keypair();
        let mut tx = two_input_tx(kp.public.clone());
        let digest = tx.signing_digest();

        sign_unsigned_inputs(&mut tx, &kp.private);

        let sig = tx.inputs[0].signature.as_ref().unwrap();
        assert!(verify_signature(&digest, sig, &kp.public));
    }

    #[test]
    fn fully_signed_tx_is_untouched() {
        let kp = generate_keypair();
        let mut tx = two_input_tx(kp.public.clone());
        sign_unsigned_inputs(&mut tx, &kp.private);
        assert_eq!(sign_unsigned_inputs(&mut tx, &kp.private), 0);
    }
}
