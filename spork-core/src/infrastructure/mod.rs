//! Infrastructure layer: key material, peer transport, configuration and logging.

pub mod config;
pub mod keys;
pub mod logging;
pub mod transport;
