use super::messages::SporkMessage;
use crate::foundation::{SporkError, MAX_MESSAGE_SIZE_BYTES};
use bincode::Options;

const WIRE_PROTOCOL_VERSION_V1: u16 = 1;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding().with_limit(MAX_MESSAGE_SIZE_BYTES as u64)
}

pub fn encode_message(message: &SporkMessage) -> Result<Vec<u8>, SporkError> {
    let bytes = wire_options().serialize(message).map_err(|err| crate::serde_err!("bincode", err))?;
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.extend_from_slice(&WIRE_PROTOCOL_VERSION_V1.to_le_bytes());
    out.extend_from_slice(&bytes);
    if out.len() > MAX_MESSAGE_SIZE_BYTES {
        return Err(SporkError::MessageTooLarge { size: out.len(), max: MAX_MESSAGE_SIZE_BYTES });
    }
    Ok(out)
}

pub fn decode_message(bytes: &[u8]) -> Result<SporkMessage, SporkError> {
    if bytes.len() > MAX_MESSAGE_SIZE_BYTES {
        return Err(SporkError::MessageTooLarge { size: bytes.len(), max: MAX_MESSAGE_SIZE_BYTES });
    }
    if bytes.len() < 2 {
        return Err(SporkError::EncodingError("spork message too short".to_string()));
    }
    let version = u16::from_le_bytes([bytes[0], bytes[1]]);
    if version != WIRE_PROTOCOL_VERSION_V1 {
        return Err(SporkError::EncodingError(format!(
            "wire protocol version mismatch: expected {WIRE_PROTOCOL_VERSION_V1}, got {version}"
        )));
    }
    wire_options().deserialize(&bytes[2..]).map_err(|err| crate::serde_err!("bincode", err))
}
