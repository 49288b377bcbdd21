//! Application layer: the node engine and the pieces it drives.

pub mod engine;
pub mod gossip;
pub mod local_signer;
pub mod observer;

pub use engine::{EngineOptions, ProcessOutcome, SporkEngine};
pub use gossip::GossipPropagator;
pub use local_signer::LocalSigner;
pub use observer::{CompositeObserver, FlagObserver, NoopObserver};
