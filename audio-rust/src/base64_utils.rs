use crate::AudioResult;
use base64::Engine as _;

/// Decodes a standard-alphabet, padded base64 payload into raw bytes.
///
/// # Errors
///
/// [`AudioError::Decode`](crate::AudioError::Decode) when the text is not valid base64.
pub fn decode_payload(b64: &str) -> AudioResult<Vec<u8>> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(b64)?;
    Ok(bytes)
}

pub fn encode_payload(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
