use crate::domain::{InsertOutcome, Signal};
use crate::foundation::{FlagId, FlagValue, RejectReason};
use log::{debug, info, trace};
use std::sync::Arc;

/// Hooks fired by the engine. Feature-specific reactions to a flag flipping
/// live behind this trait instead of inside the engine.
///
/// `on_effective_value_changed` runs while the flag's lock is held, so calls
/// for one flag arrive in order. It may read engine state but must not submit
/// signals for the same flag.
pub trait FlagObserver: Send + Sync {
    fn on_signal_accepted(&self, _signal: &Signal, _outcome: InsertOutcome) {}
    fn on_signal_rejected(&self, _signal: &Signal, _reason: RejectReason) {}
    fn on_effective_value_changed(&self, _flag: FlagId, _old: FlagValue, _new: FlagValue) {}
    fn on_keyset_rotated(&self, _old_version: u32, _new_version: u32) {}
}

pub struct NoopObserver;

impl FlagObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn FlagObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn FlagObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagObserver for CompositeObserver {
    fn on_signal_accepted(&self, signal: &Signal, outcome: InsertOutcome) {
        trace!("on_signal_accepted dispatch observer_count={} flag={}", self.observers.len(), signal.flag_id);
        for observer in &self.observers {
            observer.on_signal_accepted(signal, outcome);
        }
    }

    fn on_signal_rejected(&self, signal: &Signal, reason: RejectReason) {
        debug!("signal rejected flag={} signer={} reason={}", signal.flag_id, signal.signer_id, reason);
        for observer in &self.observers {
            observer.on_signal_rejected(signal, reason);
        }
    }

    fn on_effective_value_changed(&self, flag: FlagId, old: FlagValue, new: FlagValue) {
        trace!("on_effective_value_changed dispatch observer_count={} flag={}", self.observers.len(), flag);
        for (idx, observer) in self.observers.iter().enumerate() {
            trace!("on_effective_value_changed calling observer observer_index={}", idx);
            observer.on_effective_value_changed(flag, old, new);
        }
    }

    fn on_keyset_rotated(&self, old_version: u32, new_version: u32) {
        info!("keyset rotated dispatch old_version={} new_version={}", old_version, new_version);
        for observer in &self.observers {
            observer.on_keyset_rotated(old_version, new_version);
        }
    }
}
