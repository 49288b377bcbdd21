//! Registry of governed flags and their default values.
//!
//! The engine treats values as opaque. [`ValueRule`] is the decoding table used by
//! call sites that need to interpret a value (e.g. "is this feature on yet?").
//!
//! IDs are never reused: an old node must not mistake a new flag for a retired one.

use crate::foundation::{FlagId, FlagValue, Timestamp, SPORK_DISABLED_SENTINEL};

pub const SPORK_2_INSTANTSEND_ENABLED: FlagId = FlagId::new(10001);
pub const SPORK_3_INSTANTSEND_BLOCK_FILTERING: FlagId = FlagId::new(10002);
pub const SPORK_5_INSTANTSEND_MAX_VALUE: FlagId = FlagId::new(10004);
pub const SPORK_6_NEW_SIGS: FlagId = FlagId::new(10005);
pub const SPORK_8_MASTERNODE_PAYMENT_ENFORCEMENT: FlagId = FlagId::new(10007);
pub const SPORK_9_SUPERBLOCKS_ENABLED: FlagId = FlagId::new(10008);
pub const SPORK_10_MASTERNODE_PAY_UPDATED_NODES: FlagId = FlagId::new(10009);
pub const SPORK_12_RECONSIDER_BLOCKS: FlagId = FlagId::new(10011);
pub const SPORK_14_REQUIRE_SENTINEL_FLAG: FlagId = FlagId::new(10013);

/// How a flag's value is meant to be read outside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueRule {
    /// Feature is active once `value < now`; `0` means always on.
    ActivationTime,
    /// Value is a plain numeric parameter.
    Scalar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagSpec {
    pub id: FlagId,
    pub name: &'static str,
    pub default_value: FlagValue,
    pub rule: ValueRule,
}

const fn spec(id: FlagId, name: &'static str, default_value: FlagValue, rule: ValueRule) -> FlagSpec {
    FlagSpec { id, name, default_value, rule }
}

pub static FLAG_REGISTRY: &[FlagSpec] = &[
    spec(SPORK_2_INSTANTSEND_ENABLED, "SPORK_2_INSTANTSEND_ENABLED", 0, ValueRule::ActivationTime),
    spec(SPORK_3_INSTANTSEND_BLOCK_FILTERING, "SPORK_3_INSTANTSEND_BLOCK_FILTERING", 0, ValueRule::ActivationTime),
    spec(SPORK_5_INSTANTSEND_MAX_VALUE, "SPORK_5_INSTANTSEND_MAX_VALUE", 1000, ValueRule::Scalar),
    spec(SPORK_6_NEW_SIGS, "SPORK_6_NEW_SIGS", SPORK_DISABLED_SENTINEL, ValueRule::ActivationTime),
    spec(SPORK_8_MASTERNODE_PAYMENT_ENFORCEMENT, "SPORK_8_MASTERNODE_PAYMENT_ENFORCEMENT", SPORK_DISABLED_SENTINEL, ValueRule::ActivationTime),
    spec(SPORK_9_SUPERBLOCKS_ENABLED, "SPORK_9_SUPERBLOCKS_ENABLED", SPORK_DISABLED_SENTINEL, ValueRule::ActivationTime),
    spec(SPORK_10_MASTERNODE_PAY_UPDATED_NODES, "SPORK_10_MASTERNODE_PAY_UPDATED_NODES", SPORK_DISABLED_SENTINEL, ValueRule::ActivationTime),
    spec(SPORK_12_RECONSIDER_BLOCKS, "SPORK_12_RECONSIDER_BLOCKS", 0, ValueRule::Scalar),
    spec(SPORK_14_REQUIRE_SENTINEL_FLAG, "SPORK_14_REQUIRE_SENTINEL_FLAG", SPORK_DISABLED_SENTINEL, ValueRule::ActivationTime),
];

pub fn spec_for(flag: FlagId) -> Option<&'static FlagSpec> {
    FLAG_REGISTRY.iter().find(|spec| spec.id == flag)
}

pub fn is_known(flag: FlagId) -> bool {
    spec_for(flag).is_some()
}

pub fn flag_id_by_name(name: &str) -> Option<FlagId> {
    FLAG_REGISTRY.iter().find(|spec| spec.name == name).map(|spec| spec.id)
}

pub fn flag_name(flag: FlagId) -> Option<&'static str> {
    spec_for(flag).map(|spec| spec.name)
}

pub fn default_value(flag: FlagId) -> Option<FlagValue> {
    spec_for(flag).map(|spec| spec.default_value)
}

/// Interprets `value` for `flag` at time `now`.
///
/// Unknown flags are never active. `Scalar` flags are active when nonzero.
pub fn is_active(flag: FlagId, value: FlagValue, now: Timestamp) -> bool {
    match spec_for(flag).map(|spec| spec.rule) {
        Some(ValueRule::ActivationTime) => value < i64::try_from(now).unwrap_or(i64::MAX),
        Some(ValueRule::Scalar) => value != 0,
        None => false,
    }
}
