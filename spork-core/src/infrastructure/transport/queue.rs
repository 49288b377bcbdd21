use super::messages::SporkMessage;
use super::traits::{PeerSender, Result};
use crate::foundation::{PeerId, SporkError};
use log::warn;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Bounded outbound queue for one peer. A full queue drops the message instead of waiting.
pub struct PeerQueue {
    peer_id: PeerId,
    tx: mpsc::Sender<SporkMessage>,
    dropped: AtomicU64,
}

impl PeerQueue {
    pub fn channel(peer_id: PeerId, capacity: usize) -> (Self, mpsc::Receiver<SporkMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { peer_id, tx, dropped: AtomicU64::new(0) }, rx)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl PeerSender for PeerQueue {
    fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    fn try_send(&self, message: SporkMessage) -> Result<()> {
        match self.tx.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("peer outbound queue full, dropping message peer_id={} dropped_total={}", self.peer_id, dropped);
                Err(SporkError::PeerQueueFull { peer_id: self.peer_id.to_string() })
            }
            Err(TrySendError::Closed(_)) => Err(SporkError::TransportError {
                operation: "peer_queue_send".to_string(),
                details: format!("queue closed peer_id={}", self.peer_id),
            }),
        }
    }
}
