//! Per-flag storage of the latest accepted signal from each signer.

use crate::domain::Signal;
use crate::foundation::{FlagId, SignalHash, SignerId};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First signal seen from this signer for this flag.
    Inserted,
    /// Replaced an older signal from the same signer.
    Superseded,
    /// Equal or older `signed_at` than what is stored; discarded.
    Stale,
}

impl InsertOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, InsertOutcome::Stale)
    }
}

/// `signer -> latest signal` for one flag. At most one entry per signer.
#[derive(Clone, Debug, Default)]
pub struct FlagState {
    signals: BTreeMap<SignerId, Signal>,
}

impl FlagState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal: Signal) -> InsertOutcome {
        match self.signals.get(&signal.signer_id) {
            None => {
                self.signals.insert(signal.signer_id, signal);
                InsertOutcome::Inserted
            }
            Some(existing) if signal.signed_at > existing.signed_at => {
                self.signals.insert(signal.signer_id, signal);
                InsertOutcome::Superseded
            }
            Some(_) => InsertOutcome::Stale,
        }
    }

    pub fn get(&self, signer: &SignerId) -> Option<&Signal> {
        self.signals.get(signer)
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.values()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// All flag states. Each flag has its own lock; unrelated flags never contend.
#[derive(Default)]
pub struct FlagStateStore {
    flags: RwLock<HashMap<FlagId, Arc<Mutex<FlagState>>>>,
}

impl FlagStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, flag: FlagId) -> Arc<Mutex<FlagState>> {
        if let Some(slot) = self.flags.read().get(&flag) {
            return Arc::clone(slot);
        }
        let mut guard = self.flags.write();
        Arc::clone(guard.entry(flag).or_default())
    }

    fn existing_slots(&self) -> Vec<(FlagId, Arc<Mutex<FlagState>>)> {
        self.flags.read().iter().map(|(flag, slot)| (*flag, Arc::clone(slot))).collect()
    }

    /// Runs `f` with exclusive access to `flag`'s state.
    pub fn with_flag<R>(&self, flag: FlagId, f: impl FnOnce(&mut FlagState) -> R) -> R {
        let slot = self.slot(flag);
        let mut state = slot.lock();
        f(&mut *state)
    }

    pub fn insert(&self, signal: Signal) -> InsertOutcome {
        self.with_flag(signal.flag_id, |state| state.insert(signal))
    }

    pub fn entries(&self, flag: FlagId) -> Vec<Signal> {
        let slot = self.flags.read().get(&flag).cloned();
        slot.map(|slot| slot.lock().signals().cloned().collect()).unwrap_or_default()
    }

    pub fn all_signals(&self) -> Vec<Signal> {
        let mut out = Vec::new();
        for (_, slot) in self.existing_slots() {
            out.extend(slot.lock().signals().cloned());
        }
        out
    }

    pub fn get_by_hash(&self, hash: &SignalHash) -> Option<Signal> {
        self.existing_slots().into_iter().find_map(|(_, slot)| slot.lock().signals().find(|signal| signal.hash() == *hash).cloned())
    }

    pub fn flags(&self) -> Vec<FlagId> {
        let mut flags: Vec<FlagId> = self.flags.read().keys().copied().collect();
        flags.sort();
        flags
    }

    /// Total number of stored signals.
    pub fn len(&self) -> usize {
        self.existing_slots().iter().map(|(_, slot)| slot.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
