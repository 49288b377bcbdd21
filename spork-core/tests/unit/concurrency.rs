//! Same-flag work from many threads, and rotation racing ingestion.

use crate::fixtures::{engine_with, keyset_of, outsider, signal, signer_a, signer_b, signer_c, two_of_three, TEST_SIGNED_AT};
use parking_lot::Mutex;
use spork_core::application::{FlagObserver, SporkEngine};
use spork_core::domain::flags::{self, SPORK_12_RECONSIDER_BLOCKS, SPORK_2_INSTANTSEND_ENABLED, SPORK_5_INSTANTSEND_MAX_VALUE};
use spork_core::domain::{resolver, FlagState, InsertOutcome, KeySet, Signal};
use spork_core::foundation::{FlagId, FlagValue};
use spork_core::infrastructure::keys::SporkSigningKey;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const ROUNDS: u64 = 40;

/// Alternates between two values so the quorum keeps moving.
fn flip_flop(key: &SporkSigningKey, flag: FlagId) -> Vec<Signal> {
    (0..ROUNDS).map(|i| signal().flag(flag).value(if i % 2 == 0 { 5 } else { 0 }).signed_at(TEST_SIGNED_AT + i).sign(key)).collect()
}

fn recomputed(engine: &SporkEngine, flag: FlagId) -> FlagValue {
    let mut state = FlagState::new();
    for signal in engine.signals(flag) {
        state.insert(signal);
    }
    resolver::effective_value(&state, &engine.keyset(), flags::default_value(flag).expect("registered"))
}

#[derive(Default)]
struct ChangeLog {
    accepted: AtomicUsize,
    changes: Mutex<Vec<(FlagValue, FlagValue)>>,
}

impl FlagObserver for ChangeLog {
    fn on_signal_accepted(&self, _signal: &Signal, _outcome: InsertOutcome) {
        // Widen the gap between the state change and the caller returning.
        if self.accepted.fetch_add(1, Ordering::Relaxed) % 3 == 0 {
            thread::sleep(Duration::from_micros(200));
        }
    }

    fn on_effective_value_changed(&self, _flag: FlagId, old: FlagValue, new: FlagValue) {
        self.changes.lock().push((old, new));
    }
}

#[test]
fn test_concurrency_when_one_flag_hammered_then_state_matches_fresh_resolution() {
    let engine = Arc::new(engine_with(two_of_three(1), None));
    let flag = SPORK_5_INSTANTSEND_MAX_VALUE;
    let keys = [signer_a(), signer_b(), signer_c()];

    let mut handles = Vec::new();
    for key in &keys {
        let signals = flip_flop(key, flag);
        // Two workers per signer: one forwards, one backwards, so supersedes and stales interleave.
        for reverse in [false, true] {
            let engine = Arc::clone(&engine);
            let mut signals = signals.clone();
            if reverse {
                signals.reverse();
            }
            handles.push(thread::spawn(move || {
                for signal in signals {
                    engine.process_signal(signal, None);
                }
            }));
        }
    }
    for handle in handles {
        handle.join().expect("worker");
    }

    let stored = engine.signals(flag);
    assert!(stored.len() <= keys.len());
    assert_eq!(stored.len(), keys.len());
    assert!(stored.iter().all(|signal| signal.signed_at == TEST_SIGNED_AT + ROUNDS - 1));
    assert_eq!(engine.effective_value(flag).expect("known"), recomputed(&engine, flag));
    assert_eq!(engine.effective_value(flag).expect("known"), 0);
}

#[test]
fn test_concurrency_when_quorum_flips_across_threads_then_observer_sees_ordered_chain() {
    let log = Arc::new(ChangeLog::default());
    let engine = Arc::new(engine_with(two_of_three(1), None).with_observer(log.clone()));
    let flag = SPORK_5_INSTANTSEND_MAX_VALUE;

    let handles: Vec<_> = [signer_a(), signer_b(), signer_c()]
        .iter()
        .map(|key| {
            let engine = Arc::clone(&engine);
            let signals = flip_flop(key, flag);
            thread::spawn(move || {
                for signal in signals {
                    engine.process_signal(signal, None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let changes = log.changes.lock();
    let mut current = flags::default_value(flag).expect("registered");
    for (old, new) in changes.iter() {
        assert_eq!(*old, current, "notification out of order: {changes:?}");
        assert_ne!(old, new);
        current = *new;
    }
    assert_eq!(current, engine.effective_value(flag).expect("known"));
}

#[test]
fn test_concurrency_when_rotating_during_ingestion_then_cache_matches_recompute() {
    let engine = Arc::new(engine_with(two_of_three(1), None));
    let tracked = [SPORK_2_INSTANTSEND_ENABLED, SPORK_5_INSTANTSEND_MAX_VALUE, SPORK_12_RECONSIDER_BLOCKS];
    let wide = [signer_a(), signer_b(), signer_c(), outsider()];

    let mut handles = Vec::new();
    for key in &wide {
        for flag in tracked {
            let engine = Arc::clone(&engine);
            let signals = flip_flop(key, flag);
            handles.push(thread::spawn(move || {
                for signal in signals {
                    engine.process_signal(signal, None);
                }
            }));
        }
    }

    let rotator = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let with_b = keyset_of(0, &[&signer_a(), &signer_b(), &signer_c()], 2);
            let with_outsider = keyset_of(0, &[&signer_a(), &signer_c(), &outsider()], 2);
            for version in 2..=30u32 {
                let members = if version % 2 == 0 { with_outsider.signers() } else { with_b.signers() };
                let next = KeySet::new(version, members.iter().copied(), 2).expect("keyset");
                engine.rotate_keyset(next).expect("rotate");
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().expect("worker");
    }
    rotator.join().expect("rotator");

    assert_eq!(engine.keyset().version(), 30);
    for flag in tracked {
        assert!(engine.signals(flag).len() <= wide.len());
        assert_eq!(engine.effective_value(flag).expect("known"), recomputed(&engine, flag), "flag {flag}");
    }
}
