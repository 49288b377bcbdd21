use crate::foundation::{FlagId, FlagValue, Hash32, SignalHash, SignerId, Timestamp, SIGNAL_SIGNING_DOMAIN};
use serde::{Deserialize, Serialize};

/// A signed assertion: "signer S wants flag F to hold value V as of T".
///
/// Immutable once signed; copies are shared freely between nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Signal {
    pub flag_id: FlagId,
    pub value: FlagValue,
    pub signed_at: Timestamp,
    pub signer_id: SignerId,
    pub signature: Vec<u8>,
}

impl Signal {
    /// Canonical `(flag_id, value, signed_at)` bytes, little-endian fixed width.
    ///
    /// Same layout as bincode fixint encoding of the tuple.
    pub fn canonical_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        out[..4].copy_from_slice(&self.flag_id.get().to_le_bytes());
        out[4..12].copy_from_slice(&self.value.to_le_bytes());
        out[12..].copy_from_slice(&self.signed_at.to_le_bytes());
        out
    }

    /// Digest the signer signs.
    pub fn signing_hash(&self) -> Hash32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SIGNAL_SIGNING_DOMAIN);
        hasher.update(&self.canonical_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Identity of this exact signal, including who signed it and the signature.
    pub fn hash(&self) -> SignalHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.canonical_bytes());
        hasher.update(self.signer_id.as_bytes());
        hasher.update(&self.signature);
        SignalHash::new(*hasher.finalize().as_bytes())
    }
}
