use crate::domain::flags;
use crate::domain::{KeySet, Signal};
use crate::foundation::{FlagId, FlagValue, SignerId, SporkError, Timestamp};
use crate::infrastructure::keys::SporkSigningKey;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Produces signals from the node's own spork key.
///
/// `signed_at` is strictly increasing per flag even if the wall clock goes
/// backwards: each proposal uses `max(now, last + 1)`.
pub struct LocalSigner {
    key: SporkSigningKey,
    last_signed_at: Mutex<HashMap<FlagId, Timestamp>>,
}

impl LocalSigner {
    pub fn new(key: SporkSigningKey) -> Self {
        Self { key, last_signed_at: Mutex::new(HashMap::new()) }
    }

    pub fn signer_id(&self) -> SignerId {
        self.key.signer_id()
    }

    pub fn propose(&self, flag: FlagId, value: FlagValue, keyset: &KeySet, now: Timestamp) -> Result<Signal, SporkError> {
        let signer_id = self.key.signer_id();
        if !keyset.contains(&signer_id) {
            return Err(SporkError::NotAuthorizedSigner { signer_id: signer_id.to_string(), keyset_version: keyset.version() });
        }
        if !flags::is_known(flag) {
            return Err(SporkError::UnknownFlag(flag.to_string()));
        }

        let mut last = self.last_signed_at.lock();
        let signed_at = match last.get(&flag) {
            Some(prev) => now.max(prev.saturating_add(1)),
            None => now,
        };
        let mut signal = Signal { flag_id: flag, value, signed_at, signer_id, signature: Vec::new() };
        signal.signature = self.key.sign_hash(&signal.signing_hash());
        last.insert(flag, signed_at);

        info!(
            "signed spork flag={} name={} value={} signed_at={}",
            flag,
            flags::flag_name(flag).unwrap_or("?"),
            value,
            signed_at
        );
        Ok(signal)
    }

    /// Records a signal of ours seen on the network (e.g. echoed back after a
    /// restart) so the next proposal supersedes it.
    pub fn note_signed(&self, flag: FlagId, signed_at: Timestamp) {
        let mut last = self.last_signed_at.lock();
        let entry = last.entry(flag).or_insert(signed_at);
        if *entry < signed_at {
            debug!("local signer catching up flag={} signed_at={}", flag, signed_at);
            *entry = signed_at;
        }
    }

    pub fn last_signed_at(&self, flag: FlagId) -> Option<Timestamp> {
        self.last_signed_at.lock().get(&flag).copied()
    }
}
