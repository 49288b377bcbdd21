use super::messages::SporkMessage;
use crate::foundation::{PeerId, SporkError};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, SporkError>;

/// Outbound half of a peer connection. Must never block the caller.
pub trait PeerSender: Send + Sync {
    fn peer_id(&self) -> &PeerId;
    fn try_send(&self, message: SporkMessage) -> Result<()>;
}

/// Inbound side implemented by a node; the transport drives it.
pub trait InboundHandler: Send + Sync {
    fn on_peer_connected(&self, peer: PeerId, sender: Arc<dyn PeerSender>);
    fn on_peer_disconnected(&self, peer: &PeerId);
    fn on_message(&self, from: &PeerId, message: SporkMessage);
}
