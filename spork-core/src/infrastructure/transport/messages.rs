use crate::domain::Signal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SporkMessage {
    /// A single signed flag assertion.
    Spork(Signal),
    /// Ask the peer for every signal it currently stores.
    GetSporks,
}
