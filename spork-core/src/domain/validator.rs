use crate::domain::crypto::recover_signer;
use crate::domain::flags;
use crate::domain::{KeySet, Signal};
use crate::foundation::{RejectReason, Timestamp, SIGNATURE_SIZE};

/// Checks a signal against the active key set.
///
/// Order: structure, membership, signature, timestamp. Pure; no side effects on rejection.
pub fn validate(signal: &Signal, keyset: &KeySet, now: Timestamp, max_clock_skew_secs: u64) -> Result<(), RejectReason> {
    if !flags::is_known(signal.flag_id) || signal.signature.len() != SIGNATURE_SIZE {
        return Err(RejectReason::MalformedSignal);
    }
    if !keyset.contains(&signal.signer_id) {
        return Err(RejectReason::UnauthorizedSigner);
    }
    match recover_signer(&signal.signing_hash(), &signal.signature) {
        Ok(recovered) if recovered == signal.signer_id => {}
        _ => return Err(RejectReason::BadSignature),
    }
    if signal.signed_at > now.saturating_add(max_clock_skew_secs) {
        return Err(RejectReason::FutureTimestamp);
    }
    Ok(())
}
