//! In-memory network for tests and local simulations.
//!
//! Every link is a pair of bounded [`PeerQueue`]s drained by tokio tasks; messages
//! pass through the wire codec on the way.

use super::encoding::{decode_message, encode_message};
use super::queue::PeerQueue;
use super::traits::{InboundHandler, Result};
use crate::foundation::{PeerId, SporkError};
use crate::infrastructure::config::SporkConfig;
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct MockNetwork {
    nodes: Mutex<HashMap<PeerId, Arc<dyn InboundHandler>>>,
    links: Mutex<HashMap<(PeerId, PeerId), [JoinHandle<()>; 2]>>,
    queue_capacity: usize,
}

impl MockNetwork {
    pub fn new(queue_capacity: usize) -> Self {
        Self { nodes: Mutex::new(HashMap::new()), links: Mutex::new(HashMap::new()), queue_capacity }
    }

    /// Links use the configured per-peer queue capacity.
    pub fn from_config(config: &SporkConfig) -> Self {
        Self::new(config.peer_queue_capacity)
    }

    pub fn add_node(&self, peer_id: PeerId, handler: Arc<dyn InboundHandler>) {
        self.nodes.lock().insert(peer_id, handler);
    }

    fn node(&self, peer_id: &PeerId) -> Result<Arc<dyn InboundHandler>> {
        self.nodes.lock().get(peer_id).cloned().ok_or_else(|| SporkError::TransportError {
            operation: "mock_connect".to_string(),
            details: format!("unknown node {peer_id}"),
        })
    }

    fn link_key(a: &PeerId, b: &PeerId) -> (PeerId, PeerId) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    /// Connects two nodes in both directions. Must run inside a tokio runtime.
    pub fn connect(&self, a: &PeerId, b: &PeerId) -> Result<()> {
        if a == b {
            return Err(SporkError::TransportError { operation: "mock_connect".to_string(), details: "self connection".to_string() });
        }
        let key = Self::link_key(a, b);
        if self.links.lock().contains_key(&key) {
            return Ok(());
        }
        let node_a = self.node(a)?;
        let node_b = self.node(b)?;

        let (a_to_b, rx_b) = PeerQueue::channel(b.clone(), self.queue_capacity);
        let (b_to_a, rx_a) = PeerQueue::channel(a.clone(), self.queue_capacity);
        // Both sides know each other before anything is delivered.
        node_a.on_peer_connected(b.clone(), Arc::new(a_to_b));
        node_b.on_peer_connected(a.clone(), Arc::new(b_to_a));
        let handles = [spawn_delivery(a.clone(), node_b, rx_b), spawn_delivery(b.clone(), node_a, rx_a)];
        self.links.lock().insert(key, handles);
        debug!("mock link up a={} b={}", a, b);
        Ok(())
    }

    pub fn disconnect(&self, a: &PeerId, b: &PeerId) {
        let Some(handles) = self.links.lock().remove(&Self::link_key(a, b)) else {
            return;
        };
        for handle in handles {
            handle.abort();
        }
        if let Ok(node) = self.node(a) {
            node.on_peer_disconnected(b);
        }
        if let Ok(node) = self.node(b) {
            node.on_peer_disconnected(a);
        }
        debug!("mock link down a={} b={}", a, b);
    }
}

impl Drop for MockNetwork {
    fn drop(&mut self) {
        for (_, handles) in self.links.get_mut().drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }
}

fn spawn_delivery(
    from: PeerId,
    to: Arc<dyn InboundHandler>,
    mut rx: mpsc::Receiver<super::messages::SporkMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let message = match encode_message(&message).and_then(|bytes| decode_message(&bytes)) {
                Ok(message) => message,
                Err(err) => {
                    warn!("mock link dropped undecodable message from={} error={}", from, err);
                    continue;
                }
            };
            to.on_message(&from, message);
        }
    })
}
