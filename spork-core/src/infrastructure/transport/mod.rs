//! Peer messaging seam. The real transport lives outside this crate; it only needs
//! to implement [`PeerSender`] and drive an [`InboundHandler`].

pub mod encoding;
pub mod messages;
pub mod mock;
pub mod queue;
pub mod traits;

pub use messages::SporkMessage;
pub use queue::PeerQueue;
pub use traits::{InboundHandler, PeerSender};
