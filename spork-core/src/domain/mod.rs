//! Domain layer: pure spork governance logic with no I/O.
//!
//! Data flow: a [`Signal`] is checked by [`validator::validate`], stored in the
//! [`FlagStateStore`], and the flag's effective value is re-derived by
//! [`resolver::resolve`] against the active [`KeySet`].

pub mod crypto;
pub mod flags;
pub mod keyset;
pub mod resolver;
pub mod signal;
pub mod store;
pub mod validator;

pub use flags::{FlagSpec, ValueRule, FLAG_REGISTRY};
pub use keyset::{KeySet, KeySetHandle};
pub use resolver::Resolution;
pub use signal::Signal;
pub use store::{FlagState, FlagStateStore, InsertOutcome};
