use crate::domain::crypto::{encode_recoverable, recover_signer, signer_id_from_public_key};
use crate::foundation::util::encoding::parse_hex_fixed;
use crate::foundation::{Hash32, SignerId, SporkError};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;

/// Local spork signing key. Never serialized.
#[derive(Clone)]
pub struct SporkSigningKey {
    key: SecretKey,
    signer_id: SignerId,
}

impl SporkSigningKey {
    pub fn from_secret_key(key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &key);
        Self { key, signer_id: signer_id_from_public_key(&public_key) }
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SporkError> {
        let key = SecretKey::from_slice(&bytes).map_err(|err| SporkError::InvalidSigningKey(err.to_string()))?;
        Ok(Self::from_secret_key(key))
    }

    pub fn from_hex(hex: &str) -> Result<Self, SporkError> {
        let bytes = parse_hex_fixed::<32>(hex).map_err(|err| SporkError::InvalidSigningKey(err.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(&Secp256k1::signing_only(), &self.key)
    }

    pub fn signer_id(&self) -> SignerId {
        self.signer_id
    }

    /// 65-byte recoverable signature over `hash`.
    pub fn sign_hash(&self, hash: &Hash32) -> Vec<u8> {
        let message = Message::from_digest(*hash);
        let signature = Secp256k1::signing_only().sign_ecdsa_recoverable(&message, &self.key);
        encode_recoverable(&signature)
    }

    /// Signs a fixed digest and checks it recovers to this key's address.
    pub fn self_check(&self) -> Result<(), SporkError> {
        let digest = *blake3::hash(b"spork-signer-self-check").as_bytes();
        let signature = self.sign_hash(&digest);
        let recovered = recover_signer(&digest, &signature)
            .map_err(|err| SporkError::SignerKeyCheckFailed { details: err.to_string() })?;
        if recovered != self.signer_id {
            return Err(SporkError::SignerKeyCheckFailed {
                details: format!("recovered {} expected {}", recovered, self.signer_id),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for SporkSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SporkSigningKey").field("signer_id", &self.signer_id).field("key", &"<redacted>").finish()
    }
}
