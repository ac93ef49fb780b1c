use crate::{decode_payload, encode_wav, interpret_pcm16, AudioContainer, AudioResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

/// A validated speech payload: base64 linear16 samples plus the format they
/// were produced in. The format is an operational setting of the caller; it is
/// never sniffed from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPayload {
    /// Base64 little-endian signed 16-bit samples, interleaved by channel.
    pub data: String,
    /// E.g. 24000.
    pub sample_rate: u32,
    /// E.g. 1.
    pub channels: u16,
}

impl SpeechPayload {
    pub fn new(data: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            data: data.into(),
            sample_rate,
            channels,
        }
    }
}

/// A playable container and how long it plays.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    pub container: AudioContainer,
    pub frame_count: usize,
    /// Seconds.
    pub duration: f64,
}

/// Decodes, interprets and re-encodes a speech payload as a WAV file.
///
/// # Errors
///
/// Propagates the first failing stage: [`AudioError::Decode`](crate::AudioError::Decode),
/// [`AudioError::Interpretation`](crate::AudioError::Interpretation) or
/// [`AudioError::Encoding`](crate::AudioError::Encoding).
pub fn render_speech(payload: &SpeechPayload) -> AudioResult<RenderedAudio> {
    let span = debug_span!(
        "songsmith_audio.render",
        sample_rate = payload.sample_rate,
        channels = payload.channels
    );
    let _entered = span.enter();

    let bytes = decode_payload(&payload.data)?;
    let buffer = interpret_pcm16(&bytes, payload.sample_rate, payload.channels)?;
    let frame_count = buffer.frame_count();
    let duration = buffer.duration();
    let container = encode_wav(&buffer)?;

    debug!(
        raw_bytes = bytes.len(),
        frame_count,
        duration,
        container_bytes = container.len(),
        "rendered speech payload"
    );

    Ok(RenderedAudio {
        container,
        frame_count,
        duration,
    })
}
