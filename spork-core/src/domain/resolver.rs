//! Threshold resolution of a flag's effective value.
//!
//! Pure function of the flag's stored signals and the active key set; it can be
//! re-derived at any time without history.

use crate::domain::{FlagState, KeySet};
use crate::foundation::{FlagValue, SignerId};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one value holds at least `threshold` current signers.
    Quorum { value: FlagValue, signers: Vec<SignerId> },
    /// Several values reached quorum. Only possible when the key set lacks
    /// `threshold > N/2`; `value` is the deterministic tie-break winner.
    Contested { value: FlagValue, candidates: Vec<FlagValue> },
    NoQuorum,
}

impl Resolution {
    pub fn value(&self) -> Option<FlagValue> {
        match self {
            Resolution::Quorum { value, .. } | Resolution::Contested { value, .. } => Some(*value),
            Resolution::NoQuorum => None,
        }
    }
}

#[derive(Default)]
struct Group {
    signers: Vec<SignerId>,
    signed_at_sum: u128,
}

pub fn resolve(state: &FlagState, keyset: &KeySet) -> Resolution {
    let mut groups: BTreeMap<FlagValue, Group> = BTreeMap::new();
    for signal in state.signals() {
        if !keyset.contains(&signal.signer_id) {
            continue;
        }
        let group = groups.entry(signal.value).or_default();
        group.signers.push(signal.signer_id);
        group.signed_at_sum += u128::from(signal.signed_at);
    }

    let mut winners: Vec<(FlagValue, Group)> =
        groups.into_iter().filter(|(_, group)| group.signers.len() >= keyset.threshold()).collect();

    match winners.len() {
        0 => Resolution::NoQuorum,
        1 => {
            let (value, group) = winners.remove(0);
            Resolution::Quorum { value, signers: group.signers }
        }
        _ => {
            let candidates = winners.iter().map(|(value, _)| *value).collect();
            // Greatest summed signed_at wins; ties go to the numerically smaller value.
            // `max_by` yields the last of equal maxima; iterate descending so that is the smaller value.
            let value = winners
                .iter()
                .rev()
                .max_by(|(_, a), (_, b)| a.signed_at_sum.cmp(&b.signed_at_sum))
                .map(|(value, _)| *value)
                .unwrap_or_default();
            Resolution::Contested { value, candidates }
        }
    }
}

/// Effective value of a flag, falling back to `default` without quorum.
pub fn effective_value(state: &FlagState, keyset: &KeySet, default: FlagValue) -> FlagValue {
    resolve(state, keyset).value().unwrap_or(default)
}
