//! Turns loosely-shaped `generateContent` responses into the values the
//! studio needs, rejecting anything that is missing before it reaches the
//! audio pipeline.

use crate::{
    google::api::{Blob, Candidate, GenerateContentResponse, Part},
    CoverArt, StudioError, StudioResult,
};
use songsmith_audio::SpeechPayload;
use tracing::warn;

const BOUNDARY: &str = "response";

fn first_candidate(response: &GenerateContentResponse) -> Option<&Candidate> {
    response.candidates.as_ref().and_then(|c| c.first())
}

fn candidate_parts(response: &GenerateContentResponse) -> &[Part] {
    first_candidate(response)
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.as_deref())
        .unwrap_or_default()
}

/// Text of the first candidate, skipping thought parts. `None` when the
/// candidate carries no non-blank text.
#[must_use]
pub fn text(response: &GenerateContentResponse) -> Option<String> {
    let text: String = candidate_parts(response)
        .iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// The first inline image of the first candidate.
#[must_use]
pub fn inline_image(response: &GenerateContentResponse) -> Option<CoverArt> {
    candidate_parts(response).iter().find_map(|part| {
        let Blob {
            data, mime_type, ..
        } = part.inline_data.as_ref()?;
        let mime_type = mime_type.as_deref()?;
        let data = data.as_deref().filter(|data| !data.is_empty())?;
        if base_mime_type(mime_type).starts_with("image/") {
            Some(CoverArt::Generated {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            })
        } else {
            None
        }
    })
}

/// Extracts the speech payload from the first part of the first candidate.
///
/// The sample rate and channel count are what the caller configured for the
/// speech model. A `rate=` parameter on the MIME type is only checked
/// against the configured rate.
pub fn speech_payload(
    response: &GenerateContentResponse,
    sample_rate: u32,
    channels: u16,
) -> StudioResult<SpeechPayload> {
    let candidate = first_candidate(response).ok_or_else(|| {
        StudioError::Invariant(BOUNDARY, "No candidate in speech response".to_string())
    })?;
    let inline_data = candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.as_ref())
        .and_then(|parts| parts.first())
        .and_then(|part| part.inline_data.as_ref())
        .ok_or_else(|| {
            StudioError::Invariant(
                BOUNDARY,
                format!(
                    "Speech response has no inline audio (finish reason: {:?})",
                    candidate.finish_reason
                ),
            )
        })?;
    let data = inline_data
        .data
        .as_deref()
        .filter(|data| !data.is_empty())
        .ok_or_else(|| {
            StudioError::Invariant(BOUNDARY, "Speech inline data is empty".to_string())
        })?;

    if let Some(mime_type) = inline_data.mime_type.as_deref() {
        if let Some(announced) = mime_rate(mime_type) {
            if announced != sample_rate {
                warn!(
                    announced,
                    configured = sample_rate,
                    mime_type,
                    "speech sample rate differs from configuration"
                );
            }
        }
    }

    Ok(SpeechPayload::new(data, sample_rate, channels))
}

/// `audio/L16; codec=pcm` → `audio/l16`.
fn base_mime_type(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .trim()
        .to_lowercase()
}

/// The `rate` parameter of a MIME type such as `audio/L16;codec=pcm;rate=24000`.
fn mime_rate(mime_type: &str) -> Option<u32> {
    mime_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("rate") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
