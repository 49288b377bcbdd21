use crate::fixtures::{keyset_of, outsider, signer_a, signer_b, two_of_three, TEST_SIGNED_AT};
use spork_core::application::LocalSigner;
use spork_core::domain::flags::{SPORK_2_INSTANTSEND_ENABLED, SPORK_9_SUPERBLOCKS_ENABLED};
use spork_core::domain::validator::validate;
use spork_core::foundation::{FlagId, SporkError, DEFAULT_MAX_CLOCK_SKEW_SECS};

#[test]
fn test_local_signer_when_clock_regresses_then_signed_at_still_increases() {
    let keyset = two_of_three(1);
    let signer = LocalSigner::new(signer_a());

    let first = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 1, &keyset, TEST_SIGNED_AT).expect("first");
    let same_second = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 2, &keyset, TEST_SIGNED_AT).expect("second");
    let earlier = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 3, &keyset, TEST_SIGNED_AT - 500).expect("third");
    let later = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 4, &keyset, TEST_SIGNED_AT + 100).expect("fourth");

    assert_eq!(first.signed_at, TEST_SIGNED_AT);
    assert_eq!(same_second.signed_at, TEST_SIGNED_AT + 1);
    assert_eq!(earlier.signed_at, TEST_SIGNED_AT + 2);
    assert_eq!(later.signed_at, TEST_SIGNED_AT + 100);
    for signal in [&first, &same_second, &earlier, &later] {
        assert_eq!(validate(signal, &keyset, TEST_SIGNED_AT + 100, DEFAULT_MAX_CLOCK_SKEW_SECS), Ok(()));
    }
}

#[test]
fn test_local_signer_when_flags_differ_then_clocks_are_independent() {
    let keyset = two_of_three(1);
    let signer = LocalSigner::new(signer_a());
    signer.propose(SPORK_2_INSTANTSEND_ENABLED, 1, &keyset, TEST_SIGNED_AT).expect("flag 2");
    let other = signer.propose(SPORK_9_SUPERBLOCKS_ENABLED, 1, &keyset, TEST_SIGNED_AT).expect("flag 9");
    assert_eq!(other.signed_at, TEST_SIGNED_AT);
}

#[test]
fn test_local_signer_when_not_in_keyset_then_not_authorized() {
    let keyset = keyset_of(4, &[&signer_a(), &signer_b()], 2);
    let signer = LocalSigner::new(outsider());
    let err = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 1, &keyset, TEST_SIGNED_AT).expect_err("refused");
    match err {
        SporkError::NotAuthorizedSigner { keyset_version, .. } => assert_eq!(keyset_version, 4),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(signer.last_signed_at(SPORK_2_INSTANTSEND_ENABLED), None);
}

#[test]
fn test_local_signer_when_flag_unknown_then_error() {
    let signer = LocalSigner::new(signer_a());
    let err = signer.propose(FlagId::new(1), 1, &two_of_three(1), TEST_SIGNED_AT).expect_err("unknown");
    assert!(matches!(err, SporkError::UnknownFlag(_)));
}

#[test]
fn test_local_signer_when_own_signal_seen_then_next_proposal_supersedes_it() {
    let keyset = two_of_three(1);
    let signer = LocalSigner::new(signer_a());
    signer.note_signed(SPORK_2_INSTANTSEND_ENABLED, TEST_SIGNED_AT + 50);
    let next = signer.propose(SPORK_2_INSTANTSEND_ENABLED, 1, &keyset, TEST_SIGNED_AT).expect("propose");
    assert_eq!(next.signed_at, TEST_SIGNED_AT + 51);
}
