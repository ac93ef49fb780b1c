mod base64_utils;
mod container;
mod errors;
mod pcm;
mod pipeline;
mod wav;

#[cfg(test)]
mod test_utils;

pub use base64_utils::{decode_payload, encode_payload};
pub use container::{AudioContainer, WAV_MIME_TYPE};
pub use errors::*;
pub use pcm::{interpret_pcm16, normalize_sample, SampleBuffer};
pub use pipeline::{render_speech, RenderedAudio, SpeechPayload};
pub use wav::{encode_wav, quantize_sample, WavHeader};
