//! System-wide constants for spork governance.

/// Default number of distinct signers that must agree (M of N).
pub const DEFAULT_SPORK_SIG_THRESHOLD: usize = 2;

/// Far-future activation time (2099-01-01) used as the "off" value.
pub const SPORK_DISABLED_SENTINEL: i64 = 4_070_908_800;

/// How far ahead of local time a `signed_at` may be (1 hour).
pub const DEFAULT_MAX_CLOCK_SKEW_SECS: u64 = 60 * 60;

/// Capacity of each peer's outbound relay queue.
pub const DEFAULT_PEER_QUEUE_CAPACITY: usize = 256;

/// Recoverable ECDSA signature: 1 byte recovery id + 64 byte compact signature.
pub const SIGNATURE_SIZE: usize = 65;

/// Signer address size in bytes.
pub const SIGNER_ID_SIZE: usize = 20;

/// Blake3 hash size in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum encoded size of a single gossip message (64 KB).
pub const MAX_MESSAGE_SIZE_BYTES: usize = 64 * 1024;

/// Domain separator mixed into every signal signing hash.
pub const SIGNAL_SIGNING_DOMAIN: &[u8] = b"spork-signal/v1";

/// Overrides `now_secs()` when set (tests only).
pub const TEST_NOW_SECS_ENV_VAR: &str = "SPORK_TEST_NOW_SECS";
