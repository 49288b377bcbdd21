use crate::domain::KeySet;
use crate::foundation::{SignerId, SporkError};
use crate::infrastructure::config::types::SporkConfig;
use crate::infrastructure::keys::SporkSigningKey;
use std::collections::BTreeSet;
use std::str::FromStr;

impl SporkConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.keyset.signers.is_empty() {
            errors.push("keyset.signers must not be empty".to_string());
        }
        let mut distinct = BTreeSet::new();
        for signer in &self.keyset.signers {
            match SignerId::from_str(signer) {
                Ok(id) => {
                    if !distinct.insert(id) {
                        errors.push(format!("duplicate keyset.signers entry {}", signer));
                    }
                }
                Err(err) => errors.push(format!("invalid keyset.signers entry {}: {}", signer, err)),
            }
        }
        let n = distinct.len();
        if self.keyset.threshold == 0 || self.keyset.threshold > n.max(1) {
            errors.push(format!("keyset.threshold must be in 1..={} (got {})", n.max(1), self.keyset.threshold));
        }

        if let Some(key) = self.signer_key.as_deref() {
            if let Err(err) = SporkSigningKey::from_hex(key) {
                errors.push(format!("invalid signer_key: {}", err));
            }
        }

        if self.peer_queue_capacity == 0 {
            errors.push("peer_queue_capacity must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn keyset(&self) -> Result<KeySet, SporkError> {
        let signers = self
            .keyset
            .signers
            .iter()
            .map(|s| SignerId::from_str(s))
            .collect::<Result<Vec<_>, _>>()?;
        KeySet::new(self.keyset.version, signers, self.keyset.threshold)
    }

    pub fn signing_key(&self) -> Result<Option<SporkSigningKey>, SporkError> {
        self.signer_key.as_deref().map(SporkSigningKey::from_hex).transpose()
    }
}
