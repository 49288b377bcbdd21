//! The spork node: validation, per-flag state, quorum resolution and relay.
//!
//! Lock order is flag slot, then the effective-value cache. The key set is an
//! atomic snapshot and is re-loaded under the flag lock before every recompute,
//! so a concurrent rotation is never missed. Effective-value change
//! notifications fire under the flag lock, in the order the cache moved.

use crate::application::gossip::GossipPropagator;
use crate::application::local_signer::LocalSigner;
use crate::application::observer::{FlagObserver, NoopObserver};
use crate::domain::resolver::{self, Resolution};
use crate::domain::{flags, validator, FlagState, FlagStateStore, InsertOutcome, KeySet, KeySetHandle, Signal};
use crate::foundation::{
    now_secs, FlagId, FlagValue, PeerId, RejectReason, SignalHash, SignerId, SporkError, DEFAULT_MAX_CLOCK_SKEW_SECS,
};
use crate::infrastructure::config::SporkConfig;
use crate::infrastructure::keys::SporkSigningKey;
use crate::infrastructure::transport::{InboundHandler, PeerSender, SporkMessage};
use log::{debug, info, trace, warn};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_clock_skew_secs: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW_SECS }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Stored and relayed.
    Accepted { outcome: InsertOutcome, effective_changed: bool },
    /// Already known or older than what is stored. Not relayed.
    Stale,
    Rejected(RejectReason),
}

impl ProcessOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProcessOutcome::Accepted { .. })
    }
}

pub struct SporkEngine {
    keyset: KeySetHandle,
    store: FlagStateStore,
    effective: RwLock<HashMap<FlagId, FlagValue>>,
    gossip: GossipPropagator,
    local_signer: Option<LocalSigner>,
    observer: Arc<dyn FlagObserver>,
    options: EngineOptions,
}

impl SporkEngine {
    /// A configured signing key must pass a self-check and belong to `keyset`.
    pub fn new(keyset: KeySet, signing_key: Option<SporkSigningKey>, options: EngineOptions) -> Result<Self, SporkError> {
        if let Some(key) = signing_key.as_ref() {
            key.self_check()?;
            if !keyset.contains(&key.signer_id()) {
                return Err(SporkError::SignerKeyNotInKeySet { signer_id: key.signer_id().to_string() });
            }
            info!("spork signer key loaded signer_id={} keyset_version={}", key.signer_id(), keyset.version());
        }
        let effective = flags::FLAG_REGISTRY.iter().map(|spec| (spec.id, spec.default_value)).collect();
        Ok(Self {
            keyset: KeySetHandle::new(keyset),
            store: FlagStateStore::new(),
            effective: RwLock::new(effective),
            gossip: GossipPropagator::new(),
            local_signer: signing_key.map(LocalSigner::new),
            observer: Arc::new(NoopObserver),
            options,
        })
    }

    pub fn from_config(config: &SporkConfig) -> Result<Self, SporkError> {
        config.validate().map_err(|errors| SporkError::ConfigError(format!("validation failed: {:?}", errors)))?;
        let options = EngineOptions { max_clock_skew_secs: config.max_clock_skew_secs };
        Self::new(config.keyset()?, config.signing_key()?, options)
    }

    pub fn with_observer(mut self, observer: Arc<dyn FlagObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn keyset(&self) -> Arc<KeySet> {
        self.keyset.load()
    }

    pub fn signer_id(&self) -> Option<SignerId> {
        self.local_signer.as_ref().map(LocalSigner::signer_id)
    }

    pub fn gossip(&self) -> &GossipPropagator {
        &self.gossip
    }

    /// Validate, store, recompute and relay one signal. `origin` is the peer it came from,
    /// `None` for locally produced signals.
    pub fn process_signal(&self, signal: Signal, origin: Option<&PeerId>) -> ProcessOutcome {
        let keyset = self.keyset.load();
        if let Err(reason) = validator::validate(&signal, &keyset, now_secs(), self.options.max_clock_skew_secs) {
            debug!(
                "dropping signal flag={} signer={} origin={:?} reason={}",
                signal.flag_id,
                signal.signer_id,
                origin.map(|p| p.as_str()),
                reason
            );
            self.observer.on_signal_rejected(&signal, reason);
            return ProcessOutcome::Rejected(reason);
        }
        drop(keyset);

        let flag = signal.flag_id;
        let (outcome, effective_changed) = self.store.with_flag(flag, |state| {
            let outcome = state.insert(signal.clone());
            if !outcome.changed() {
                return (outcome, false);
            }
            (outcome, self.recompute_locked(flag, state))
        });

        if !outcome.changed() {
            trace!("stale signal flag={} signer={} signed_at={}", flag, signal.signer_id, signal.signed_at);
            return ProcessOutcome::Stale;
        }

        if let Some(local) = self.local_signer.as_ref() {
            if local.signer_id() == signal.signer_id {
                local.note_signed(flag, signal.signed_at);
            }
        }
        debug!(
            "accepted signal hash={} flag={} value={} signer={} outcome={:?}",
            signal.hash(),
            flag,
            signal.value,
            signal.signer_id,
            outcome
        );
        self.gossip.relay(&signal, origin);
        self.observer.on_signal_accepted(&signal, outcome);
        ProcessOutcome::Accepted { outcome, effective_changed }
    }

    /// Must run under `flag`'s store lock. Returns whether the cached value moved.
    fn recompute_locked(&self, flag: FlagId, state: &FlagState) -> bool {
        let keyset = self.keyset.load();
        let default = flags::default_value(flag).unwrap_or_default();
        let resolution = resolver::resolve(state, &keyset);
        if let Resolution::Contested { value, candidates } = &resolution {
            warn!(
                "contested spork quorum flag={} candidates={:?} chosen={} keyset_version={} threshold={} signers={}",
                flag,
                candidates,
                value,
                keyset.version(),
                keyset.threshold(),
                keyset.len()
            );
        }
        let new = resolution.value().unwrap_or(default);
        let old = self.effective.write().insert(flag, new).unwrap_or(default);
        if old == new {
            return false;
        }
        info!(
            "spork effective value changed flag={} name={} old={} new={}",
            flag,
            flags::flag_name(flag).unwrap_or("?"),
            old,
            new
        );
        self.observer.on_effective_value_changed(flag, old, new);
        true
    }

    pub fn effective_value(&self, flag: FlagId) -> Result<FlagValue, SporkError> {
        self.effective.read().get(&flag).copied().ok_or_else(|| SporkError::UnknownFlag(flag.to_string()))
    }

    /// Every registered flag with its current effective value.
    pub fn active_flags(&self) -> BTreeMap<FlagId, FlagValue> {
        let effective = self.effective.read();
        flags::FLAG_REGISTRY
            .iter()
            .map(|spec| (spec.id, effective.get(&spec.id).copied().unwrap_or(spec.default_value)))
            .collect()
    }

    /// Interprets the effective value with the flag's registered rule. Unknown flags are inactive.
    pub fn is_flag_active(&self, flag: FlagId) -> bool {
        match self.effective_value(flag) {
            Ok(value) => flags::is_active(flag, value, now_secs()),
            Err(_) => false,
        }
    }

    pub fn get_signal_by_hash(&self, hash: &SignalHash) -> Option<Signal> {
        self.store.get_by_hash(hash)
    }

    pub fn signals(&self, flag: FlagId) -> Vec<Signal> {
        self.store.entries(flag)
    }

    pub fn all_signals(&self) -> Vec<Signal> {
        self.store.all_signals()
    }

    /// Signs `value` for `flag` with the local key and feeds it through the local pipeline,
    /// which relays it on acceptance.
    pub fn set_flag(&self, flag: FlagId, value: FlagValue) -> Result<Signal, SporkError> {
        let local = self.local_signer.as_ref().ok_or(SporkError::NoLocalSigner)?;
        let signal = local.propose(flag, value, &self.keyset.load(), now_secs())?;
        match self.process_signal(signal.clone(), None) {
            ProcessOutcome::Accepted { .. } => Ok(signal),
            ProcessOutcome::Stale => Err(SporkError::LocalSignalStale { flag_id: flag.get(), signed_at: signal.signed_at }),
            ProcessOutcome::Rejected(reason) => Err(reason.into()),
        }
    }

    /// Atomically installs `next`, then re-derives every stored flag against it.
    pub fn rotate_keyset(&self, next: KeySet) -> Result<(), SporkError> {
        let old_version = self.keyset.rotate(next)?.version();
        let installed = self.keyset.load();
        if let Some(local) = self.local_signer.as_ref() {
            if !installed.contains(&local.signer_id()) {
                warn!("local spork signer dropped from keyset signer_id={} version={}", local.signer_id(), installed.version());
            }
        }

        self.observer.on_keyset_rotated(old_version, installed.version());
        let mut changed_flags = 0;
        for flag in self.store.flags() {
            if self.store.with_flag(flag, |state| self.recompute_locked(flag, state)) {
                changed_flags += 1;
            }
        }
        info!("keyset rotation applied old_version={} new_version={} changed_flags={}", old_version, installed.version(), changed_flags);
        Ok(())
    }

    /// Registers the peer and asks it for everything it knows.
    pub fn connect_peer(&self, peer: PeerId, sender: Arc<dyn PeerSender>) {
        self.gossip.add_peer(peer.clone(), Arc::clone(&sender));
        if let Err(err) = sender.try_send(SporkMessage::GetSporks) {
            warn!("failed to request sporks from new peer peer_id={} error={}", peer, err);
        }
    }

    pub fn disconnect_peer(&self, peer: &PeerId) {
        self.gossip.remove_peer(peer);
    }

    pub fn handle_message(&self, from: &PeerId, message: SporkMessage) {
        match message {
            SporkMessage::Spork(signal) => {
                self.process_signal(signal, Some(from));
            }
            SporkMessage::GetSporks => self.answer_get_sporks(from),
        }
    }

    fn answer_get_sporks(&self, from: &PeerId) {
        let Some(sender) = self.gossip.sender(from) else {
            debug!("GetSporks from unregistered peer peer_id={}", from);
            return;
        };
        let signals = self.store.all_signals();
        debug!("answering GetSporks peer_id={} signals={}", from, signals.len());
        for signal in signals {
            if let Err(err) = sender.try_send(SporkMessage::Spork(signal)) {
                warn!("GetSporks reply truncated peer_id={} error={}", from, err);
                return;
            }
        }
    }
}

impl InboundHandler for SporkEngine {
    fn on_peer_connected(&self, peer: PeerId, sender: Arc<dyn PeerSender>) {
        self.connect_peer(peer, sender);
    }

    fn on_peer_disconnected(&self, peer: &PeerId) {
        self.disconnect_peer(peer);
    }

    fn on_message(&self, from: &PeerId, message: SporkMessage) {
        self.handle_message(from, message);
    }
}
