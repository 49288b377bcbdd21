//! Signer addressing and recoverable ECDSA signature handling.
//!
//! Signature layout: `[recovery_id, r(32), s(32)]`.

use crate::foundation::{Hash32, SignerId, SporkError, SIGNATURE_SIZE, SIGNER_ID_SIZE};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};

/// Address of a public key: first 20 bytes of `blake3(compressed_pubkey)`.
pub fn signer_id_from_public_key(public_key: &PublicKey) -> SignerId {
    let digest = blake3::hash(&public_key.serialize());
    let mut out = [0u8; SIGNER_ID_SIZE];
    out.copy_from_slice(&digest.as_bytes()[..SIGNER_ID_SIZE]);
    SignerId::new(out)
}

pub fn encode_recoverable(signature: &RecoverableSignature) -> Vec<u8> {
    let (recovery_id, compact) = signature.serialize_compact();
    let mut out = Vec::with_capacity(SIGNATURE_SIZE);
    out.push(recovery_id.to_i32() as u8);
    out.extend_from_slice(&compact);
    out
}

pub fn decode_recoverable(bytes: &[u8]) -> Result<RecoverableSignature, SporkError> {
    if bytes.len() != SIGNATURE_SIZE {
        return Err(SporkError::CryptoError {
            operation: "decode_recoverable".to_string(),
            details: format!("expected {SIGNATURE_SIZE} bytes, got {}", bytes.len()),
        });
    }
    let recovery_id = RecoveryId::from_i32(i32::from(bytes[0]))?;
    Ok(RecoverableSignature::from_compact(&bytes[1..], recovery_id)?)
}

/// Recovers the signer address that produced `signature` over `hash`.
pub fn recover_signer(hash: &Hash32, signature: &[u8]) -> Result<SignerId, SporkError> {
    let signature = decode_recoverable(signature)?;
    let message = Message::from_digest(*hash);
    let public_key = Secp256k1::verification_only().recover_ecdsa(&message, &signature)?;
    Ok(signer_id_from_public_key(&public_key))
}
