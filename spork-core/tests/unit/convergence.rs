//! Delivery order must not matter: any permutation of the same signals,
//! with duplicates, ends in the same state.

use crate::fixtures::{engine_with, signal, signer_a, signer_b, signer_c, two_of_three, TEST_SIGNED_AT};
use spork_core::application::SporkEngine;
use spork_core::domain::flags::{SPORK_12_RECONSIDER_BLOCKS, SPORK_2_INSTANTSEND_ENABLED, SPORK_5_INSTANTSEND_MAX_VALUE};
use spork_core::domain::Signal;

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

fn generate_signals(rng: &mut Lcg) -> Vec<Signal> {
    let mut signals = Vec::new();
    for key in [signer_a(), signer_b(), signer_c()] {
        for flag in [SPORK_2_INSTANTSEND_ENABLED, SPORK_5_INSTANTSEND_MAX_VALUE, SPORK_12_RECONSIDER_BLOCKS] {
            for step in 0..4u64 {
                let value = (rng.next() % 3) as i64;
                signals.push(signal().flag(flag).value(value).signed_at(TEST_SIGNED_AT + step).sign(&key));
            }
        }
    }
    signals
}

fn snapshot(engine: &SporkEngine) -> (Vec<(u32, i64)>, Vec<Signal>) {
    let flags = engine.active_flags().into_iter().map(|(flag, value)| (flag.get(), value)).collect();
    let mut signals = engine.all_signals();
    signals.sort_by_key(|signal| (signal.flag_id, signal.signer_id));
    (flags, signals)
}

#[test]
fn test_convergence_when_order_shuffled_then_state_identical() {
    let mut rng = Lcg(0x5eed_5eed);
    let signals = generate_signals(&mut rng);

    let reference = engine_with(two_of_three(1), None);
    for signal in &signals {
        reference.process_signal(signal.clone(), None);
    }
    let expected = snapshot(&reference);
    assert_eq!(expected.1.len(), 9, "one latest signal per signer and flag");
    assert!(expected.1.iter().all(|signal| signal.signed_at == TEST_SIGNED_AT + 3));

    for seed in 1..=20u64 {
        let mut rng = Lcg(seed);
        let mut delivery: Vec<Signal> = signals.iter().chain(signals.iter().take(seed as usize)).cloned().collect();
        rng.shuffle(&mut delivery);

        let engine = engine_with(two_of_three(1), None);
        for signal in delivery {
            engine.process_signal(signal, None);
        }
        assert_eq!(snapshot(&engine), expected, "seed {seed}");
    }
}
