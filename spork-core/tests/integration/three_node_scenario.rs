use crate::fixtures::{add_engine, engine_with, settle, signer_a, signer_b, two_of_three, wait_until};
use spork_core::domain::flags::SPORK_2_INSTANTSEND_ENABLED;
use spork_core::foundation::{PeerId, SPORK_DISABLED_SENTINEL};
use spork_core::infrastructure::config::SporkConfig;
use spork_core::infrastructure::transport::mock::MockNetwork;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_three_nodes_when_second_signer_agrees_then_all_nodes_flip() {
    let network = MockNetwork::from_config(&SporkConfig::default());
    let node_a = add_engine(&network, "node-a", engine_with(two_of_three(1), Some(signer_a())));
    let node_b = add_engine(&network, "node-b", engine_with(two_of_three(1), Some(signer_b())));
    let node_c = add_engine(&network, "node-c", engine_with(two_of_three(1), None));
    let (a, b, c) = (PeerId::from("node-a"), PeerId::from("node-b"), PeerId::from("node-c"));
    network.connect(&a, &b).expect("a-b");
    network.connect(&b, &c).expect("b-c");
    network.connect(&a, &c).expect("a-c");
    let nodes = [&node_a, &node_b, &node_c];

    for node in nodes {
        assert_eq!(node.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 0);
        assert!(node.is_flag_active(SPORK_2_INSTANTSEND_ENABLED));
    }

    node_a.set_flag(SPORK_2_INSTANTSEND_ENABLED, SPORK_DISABLED_SENTINEL).expect("signer a");
    assert!(wait_until(|| nodes.iter().all(|node| node.signals(SPORK_2_INSTANTSEND_ENABLED).len() == 1)).await);
    settle().await;
    for node in nodes {
        assert_eq!(node.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 0, "one signer is not a quorum");
    }

    node_b.set_flag(SPORK_2_INSTANTSEND_ENABLED, SPORK_DISABLED_SENTINEL).expect("signer b");
    let converged = wait_until(|| {
        nodes.iter().all(|node| node.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(SPORK_DISABLED_SENTINEL))
    })
    .await;
    assert!(converged, "quorum did not propagate to every node");
    assert!(!node_c.is_flag_active(SPORK_2_INSTANTSEND_ENABLED));
    assert_eq!(node_c.active_flags()[&SPORK_2_INSTANTSEND_ENABLED], SPORK_DISABLED_SENTINEL);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_line_topology_when_signal_relayed_then_reaches_far_end() {
    let network = MockNetwork::new(64);
    let node_a = add_engine(&network, "node-a", engine_with(two_of_three(1), Some(signer_a())));
    let node_b = add_engine(&network, "node-b", engine_with(two_of_three(1), Some(signer_b())));
    let node_c = add_engine(&network, "node-c", engine_with(two_of_three(1), None));
    network.connect(&PeerId::from("node-a"), &PeerId::from("node-c")).expect("a-c");
    network.connect(&PeerId::from("node-c"), &PeerId::from("node-b")).expect("c-b");

    node_a.set_flag(SPORK_2_INSTANTSEND_ENABLED, 1).expect("signer a");
    node_b.set_flag(SPORK_2_INSTANTSEND_ENABLED, 1).expect("signer b");

    assert!(wait_until(|| node_a.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(1)).await);
    assert!(wait_until(|| node_b.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(1)).await);
    assert!(wait_until(|| node_c.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(1)).await);
}
