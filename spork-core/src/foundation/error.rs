use secp256k1::Error as SecpError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SignalRejected,
    NotAuthorizedSigner,
    SignerKeyNotInKeySet,
    SignerKeyCheckFailed,
    NoLocalSigner,
    LocalSignalStale,
    InvalidKeySet,
    StaleKeySetVersion,
    UnknownFlag,
    InvalidSignerId,
    InvalidSigningKey,
    CryptoError,
    SerializationError,
    EncodingError,
    MessageTooLarge,
    TransportError,
    PeerQueueFull,
    ConfigError,
    ParseError,
    Message,
}

/// Why a signal was refused at the validation boundary.
///
/// Rejections are dropped locally and never relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Signer is not a member of the active key set.
    UnauthorizedSigner,
    /// Signature does not recover to the claimed signer.
    BadSignature,
    /// `signed_at` is beyond the accepted clock skew.
    FutureTimestamp,
    /// Structurally invalid: unknown flag id or wrong signature length.
    MalformedSignal,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnauthorizedSigner => "unauthorized signer",
            Self::BadSignature => "bad signature",
            Self::FutureTimestamp => "future timestamp",
            Self::MalformedSignal => "malformed signal",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum SporkError {
    #[error("signal rejected: {0}")]
    SignalRejected(RejectReason),

    #[error("local signer {signer_id} is not a member of key set version {keyset_version}")]
    NotAuthorizedSigner { signer_id: String, keyset_version: u32 },

    #[error("configured signer key {signer_id} does not belong to the key set")]
    SignerKeyNotInKeySet { signer_id: String },

    #[error("signer key self-check failed: {details}")]
    SignerKeyCheckFailed { details: String },

    #[error("no spork signer key configured on this node")]
    NoLocalSigner,

    #[error("locally signed signal for flag {flag_id} was stale at signed_at={signed_at}")]
    LocalSignalStale { flag_id: u32, signed_at: u64 },

    #[error("invalid key set: {0}")]
    InvalidKeySet(String),

    #[error("stale key set version: current={current} attempted={attempted}")]
    StaleKeySetVersion { current: u32, attempted: u32 },

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("invalid signer id: input={input} reason={reason}")]
    InvalidSignerId { input: String, reason: String },

    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),

    #[error("crypto error during {operation}: {details}")]
    CryptoError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("message too large: {size} exceeds max {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("transport error during {operation}: {details}")]
    TransportError { operation: String, details: String },

    #[error("outbound queue full for peer {peer_id}")]
    PeerQueueFull { peer_id: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SporkError>;

impl SporkError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SporkError::SignalRejected(_) => ErrorCode::SignalRejected,
            SporkError::NotAuthorizedSigner { .. } => ErrorCode::NotAuthorizedSigner,
            SporkError::SignerKeyNotInKeySet { .. } => ErrorCode::SignerKeyNotInKeySet,
            SporkError::SignerKeyCheckFailed { .. } => ErrorCode::SignerKeyCheckFailed,
            SporkError::NoLocalSigner => ErrorCode::NoLocalSigner,
            SporkError::LocalSignalStale { .. } => ErrorCode::LocalSignalStale,
            SporkError::InvalidKeySet(_) => ErrorCode::InvalidKeySet,
            SporkError::StaleKeySetVersion { .. } => ErrorCode::StaleKeySetVersion,
            SporkError::UnknownFlag(_) => ErrorCode::UnknownFlag,
            SporkError::InvalidSignerId { .. } => ErrorCode::InvalidSignerId,
            SporkError::InvalidSigningKey(_) => ErrorCode::InvalidSigningKey,
            SporkError::CryptoError { .. } => ErrorCode::CryptoError,
            SporkError::SerializationError { .. } => ErrorCode::SerializationError,
            SporkError::EncodingError(_) => ErrorCode::EncodingError,
            SporkError::MessageTooLarge { .. } => ErrorCode::MessageTooLarge,
            SporkError::TransportError { .. } => ErrorCode::TransportError,
            SporkError::PeerQueueFull { .. } => ErrorCode::PeerQueueFull,
            SporkError::ConfigError(_) => ErrorCode::ConfigError,
            SporkError::ParseError(_) => ErrorCode::ParseError,
            SporkError::Message(_) => ErrorCode::Message,
        }
    }
}

#[macro_export]
macro_rules! serde_err {
    ($fmt:expr, $err:expr) => {
        $crate::foundation::SporkError::SerializationError { format: $fmt.into(), details: $err.to_string() }
    };
}

impl From<RejectReason> for SporkError {
    fn from(reason: RejectReason) -> Self {
        SporkError::SignalRejected(reason)
    }
}

impl From<bincode::Error> for SporkError {
    fn from(err: bincode::Error) -> Self {
        SporkError::SerializationError { format: "bincode".to_string(), details: err.to_string() }
    }
}

impl From<hex::FromHexError> for SporkError {
    fn from(err: hex::FromHexError) -> Self {
        SporkError::EncodingError(err.to_string())
    }
}

impl From<figment::Error> for SporkError {
    fn from(err: figment::Error) -> Self {
        SporkError::ConfigError(err.to_string())
    }
}

impl From<SecpError> for SporkError {
    fn from(err: SecpError) -> Self {
        SporkError::CryptoError { operation: "secp256k1".to_string(), details: err.to_string() }
    }
}
