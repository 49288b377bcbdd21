//! Multi-signer feature flag ("spork") consensus.
//!
//! Authorized signers issue signed assertions about network-wide flags; every
//! node keeps the latest assertion per signer and flag, and a flag takes a new
//! value only once a threshold of the current key set agrees on it.

pub mod application;
pub mod domain;
pub mod foundation;
pub mod infrastructure;

pub use application::{ProcessOutcome, SporkEngine};
pub use foundation::{Result, SporkError};
