//! Flood relay of accepted signals to connected peers.

use crate::domain::Signal;
use crate::foundation::PeerId;
use crate::infrastructure::transport::{PeerSender, SporkMessage};
use log::{debug, trace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct GossipPropagator {
    peers: RwLock<HashMap<PeerId, Arc<dyn PeerSender>>>,
}

impl GossipPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `peer`, replacing any previous sender for it.
    pub fn add_peer(&self, peer: PeerId, sender: Arc<dyn PeerSender>) {
        debug!("gossip peer added peer_id={}", peer);
        self.peers.write().insert(peer, sender);
    }

    pub fn remove_peer(&self, peer: &PeerId) -> bool {
        let removed = self.peers.write().remove(peer).is_some();
        if removed {
            debug!("gossip peer removed peer_id={}", peer);
        }
        removed
    }

    pub fn peer_count(&self) -> usize {
        self.peers.read().len()
    }

    pub fn sender(&self, peer: &PeerId) -> Option<Arc<dyn PeerSender>> {
        self.peers.read().get(peer).cloned()
    }

    /// Sends `signal` to every peer except `except`. Returns how many queues took it.
    ///
    /// Never blocks: a full peer queue drops its copy.
    pub fn relay(&self, signal: &Signal, except: Option<&PeerId>) -> usize {
        let targets: Vec<Arc<dyn PeerSender>> = self
            .peers
            .read()
            .iter()
            .filter(|(peer, _)| Some(*peer) != except)
            .map(|(_, sender)| Arc::clone(sender))
            .collect();

        let mut delivered = 0;
        for sender in targets {
            match sender.try_send(SporkMessage::Spork(signal.clone())) {
                Ok(()) => delivered += 1,
                Err(err) => debug!("relay skipped peer_id={} error={}", sender.peer_id(), err),
            }
        }
        trace!("relayed hash={} flag={} delivered={}", signal.hash(), signal.flag_id, delivered);
        delivered
    }
}
