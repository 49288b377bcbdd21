use crate::foundation::{SignerId, SporkError};
use arc_swap::ArcSwap;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The authorized signers and the quorum threshold (M of N).
///
/// Immutable; rotation replaces the whole set through [`KeySetHandle`].
///
/// Deserialization goes through [`KeySet::new`], so a decoded set obeys the same rules.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "KeySetWire")]
pub struct KeySet {
    version: u32,
    signers: Vec<SignerId>,
    threshold: usize,
}

#[derive(Deserialize)]
struct KeySetWire {
    version: u32,
    signers: Vec<SignerId>,
    threshold: usize,
}

impl TryFrom<KeySetWire> for KeySet {
    type Error = SporkError;

    fn try_from(wire: KeySetWire) -> Result<Self, Self::Error> {
        KeySet::new(wire.version, wire.signers, wire.threshold)
    }
}

impl KeySet {
    /// Builds a key set. Signers are sorted and de-duplicated; `1 <= threshold <= N` is enforced.
    pub fn new(version: u32, signers: impl IntoIterator<Item = SignerId>, threshold: usize) -> Result<Self, SporkError> {
        let mut signers: Vec<SignerId> = signers.into_iter().collect();
        signers.sort();
        signers.dedup();
        if signers.is_empty() {
            return Err(SporkError::InvalidKeySet("no signers".to_string()));
        }
        if threshold == 0 || threshold > signers.len() {
            return Err(SporkError::InvalidKeySet(format!("threshold {threshold} outside 1..={}", signers.len())));
        }
        Ok(Self { version, signers, threshold })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    pub fn signers(&self) -> &[SignerId] {
        &self.signers
    }

    pub fn contains(&self, signer: &SignerId) -> bool {
        self.signers.binary_search(signer).is_ok()
    }

    /// True when at most one value can reach quorum (`M > N/2`).
    pub fn has_unique_quorum(&self) -> bool {
        self.threshold * 2 > self.signers.len()
    }
}

/// Process-wide holder of the active [`KeySet`].
///
/// Readers take a snapshot with [`KeySetHandle::load`] and never see a partial rotation.
#[derive(Clone)]
pub struct KeySetHandle {
    current: Arc<ArcSwap<KeySet>>,
}

impl KeySetHandle {
    pub fn new(keyset: KeySet) -> Self {
        warn_if_ambiguous(&keyset);
        Self { current: Arc::new(ArcSwap::from_pointee(keyset)) }
    }

    pub fn load(&self) -> Arc<KeySet> {
        self.current.load_full()
    }

    /// Atomically installs `next`. Its version must be strictly greater than the active one.
    ///
    /// Returns the replaced key set.
    pub fn rotate(&self, next: KeySet) -> Result<Arc<KeySet>, SporkError> {
        let next = Arc::new(next);
        let mut result = Ok(());
        let previous = self.current.rcu(|current| {
            if next.version() <= current.version() {
                result = Err(SporkError::StaleKeySetVersion { current: current.version(), attempted: next.version() });
                Arc::clone(current)
            } else {
                result = Ok(());
                Arc::clone(&next)
            }
        });
        result?;
        warn_if_ambiguous(&next);
        info!(
            "key set rotated old_version={} new_version={} signers={} threshold={}",
            previous.version(),
            next.version(),
            next.len(),
            next.threshold()
        );
        Ok(previous)
    }
}

fn warn_if_ambiguous(keyset: &KeySet) {
    if !keyset.has_unique_quorum() {
        warn!(
            "key set configuration error: threshold {} of {} allows two values to reach quorum version={}",
            keyset.threshold(),
            keyset.len(),
            keyset.version()
        );
    }
}
