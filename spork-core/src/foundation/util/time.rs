use crate::foundation::{SporkError, Timestamp};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp_secs_env(env_var: Option<&str>) -> Result<Timestamp, SporkError> {
    if let Some(var) = env_var {
        if let Ok(value) = std::env::var(var) {
            return value.trim().parse::<u64>().map_err(|err| SporkError::ParseError(format!("{var}: {err}")));
        }
    }
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|err| SporkError::Message(err.to_string()))?;
    Ok(now.as_secs())
}

/// Returns the current wall-clock time in unix seconds.
///
/// For test determinism, this respects `TEST_NOW_SECS_ENV_VAR` when set.
pub fn now_secs() -> Timestamp {
    current_timestamp_secs_env(Some(crate::foundation::constants::TEST_NOW_SECS_ENV_VAR))
        .or_else(|_| current_timestamp_secs_env(None))
        .unwrap_or(0)
}
