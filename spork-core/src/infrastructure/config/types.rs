use crate::foundation::{DEFAULT_MAX_CLOCK_SKEW_SECS, DEFAULT_PEER_QUEUE_CAPACITY, DEFAULT_SPORK_SIG_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Node configuration: who may sign sporks, our own key, and runtime limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SporkConfig {
    #[serde(default)]
    pub keyset: KeySetConfig,
    /// Hex-encoded 32-byte secp256k1 secret. Only set on spork-signing nodes.
    #[serde(default)]
    pub signer_key: Option<String>,
    #[serde(default = "default_max_clock_skew_secs")]
    pub max_clock_skew_secs: u64,
    #[serde(default = "default_peer_queue_capacity")]
    pub peer_queue_capacity: usize,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for SporkConfig {
    fn default() -> Self {
        Self {
            keyset: KeySetConfig::default(),
            signer_key: None,
            max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW_SECS,
            peer_queue_capacity: DEFAULT_PEER_QUEUE_CAPACITY,
            log: LogConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeySetConfig {
    #[serde(default)]
    pub version: u32,
    /// Hex signer ids (20 bytes each).
    #[serde(default)]
    pub signers: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

impl Default for KeySetConfig {
    fn default() -> Self {
        Self { version: 0, signers: Vec::new(), threshold: DEFAULT_SPORK_SIG_THRESHOLD }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for rolled log files; console only when unset.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default = "default_log_filters")]
    pub filters: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { dir: None, filters: default_log_filters() }
    }
}

fn default_max_clock_skew_secs() -> u64 {
    DEFAULT_MAX_CLOCK_SKEW_SECS
}

fn default_peer_queue_capacity() -> usize {
    DEFAULT_PEER_QUEUE_CAPACITY
}

fn default_threshold() -> usize {
    DEFAULT_SPORK_SIG_THRESHOLD
}

fn default_log_filters() -> String {
    "info".to_string()
}
