use crate::foundation::SporkError;

pub fn decode_hex(s: &str) -> Result<Vec<u8>, SporkError> {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| e.into())
}

/// Parses a hex string (optional `0x` prefix) into exactly `N` bytes.
pub fn parse_hex_fixed<const N: usize>(s: &str) -> Result<[u8; N], SporkError> {
    let bytes = decode_hex(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| SporkError::EncodingError(format!("expected {N} bytes, got {len}")))
}
