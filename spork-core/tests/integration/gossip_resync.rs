use crate::fixtures::{add_engine, engine_with, settle, signal, signer_a, signer_b, two_of_three, wait_until};
use spork_core::domain::flags::{SPORK_2_INSTANTSEND_ENABLED, SPORK_5_INSTANTSEND_MAX_VALUE};
use spork_core::foundation::PeerId;
use spork_core::infrastructure::transport::mock::MockNetwork;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resync_when_peer_joins_late_then_get_sporks_catches_it_up() {
    let network = MockNetwork::new(64);
    let veteran = add_engine(&network, "veteran", engine_with(two_of_three(1), None));
    for key in [signer_a(), signer_b()] {
        assert!(veteran.process_signal(signal().value(1).sign(&key), None).is_accepted());
        assert!(veteran.process_signal(signal().flag(SPORK_5_INSTANTSEND_MAX_VALUE).value(500).sign(&key), None).is_accepted());
    }
    assert_eq!(veteran.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 1);

    let newcomer = add_engine(&network, "newcomer", engine_with(two_of_three(1), None));
    assert_eq!(newcomer.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 0);
    network.connect(&PeerId::from("newcomer"), &PeerId::from("veteran")).expect("connect");

    assert!(wait_until(|| newcomer.all_signals().len() == 4).await);
    assert_eq!(newcomer.active_flags(), veteran.active_flags());
    assert_eq!(newcomer.effective_value(SPORK_5_INSTANTSEND_MAX_VALUE).expect("known"), 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resync_when_partition_heals_then_missed_updates_arrive() {
    let network = MockNetwork::new(64);
    let left = add_engine(&network, "left", engine_with(two_of_three(1), Some(signer_a())));
    let right = add_engine(&network, "right", engine_with(two_of_three(1), Some(signer_b())));
    let (l, r) = (PeerId::from("left"), PeerId::from("right"));
    network.connect(&l, &r).expect("connect");
    settle().await;
    assert_eq!(left.gossip().peer_count(), 1);

    network.disconnect(&l, &r);
    assert_eq!(left.gossip().peer_count(), 0);
    left.set_flag(SPORK_2_INSTANTSEND_ENABLED, 7).expect("left");
    right.set_flag(SPORK_2_INSTANTSEND_ENABLED, 7).expect("right");
    settle().await;
    assert_eq!(left.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 0);
    assert_eq!(right.effective_value(SPORK_2_INSTANTSEND_ENABLED).expect("known"), 0);

    network.connect(&l, &r).expect("reconnect");
    assert!(wait_until(|| left.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(7)).await);
    assert!(wait_until(|| right.effective_value(SPORK_2_INSTANTSEND_ENABLED).ok() == Some(7)).await);
}
