use crate::{StudioError, StudioResult};
use std::{env, str::FromStr};

pub const DEFAULT_LYRIC_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
/// The speech model returns 24 kHz mono linear16.
pub const DEFAULT_SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const DEFAULT_SPEECH_CHANNELS: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioOptions {
    pub lyric_model_id: String,
    pub image_model_id: String,
    pub speech_model_id: String,
    /// Format the speech model emits. It is not carried by the payload, so it
    /// must match the model's documented output.
    pub speech_sample_rate: u32,
    pub speech_channels: u16,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            lyric_model_id: DEFAULT_LYRIC_MODEL.to_string(),
            image_model_id: DEFAULT_IMAGE_MODEL.to_string(),
            speech_model_id: DEFAULT_SPEECH_MODEL.to_string(),
            speech_sample_rate: DEFAULT_SPEECH_SAMPLE_RATE,
            speech_channels: DEFAULT_SPEECH_CHANNELS,
        }
    }
}

impl StudioOptions {
    /// Defaults overridden by `SONGSMITH_*` environment variables.
    pub fn from_env() -> StudioResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> StudioResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(model) = lookup("SONGSMITH_LYRIC_MODEL") {
            options.lyric_model_id = model;
        }
        if let Some(model) = lookup("SONGSMITH_IMAGE_MODEL") {
            options.image_model_id = model;
        }
        if let Some(model) = lookup("SONGSMITH_SPEECH_MODEL") {
            options.speech_model_id = model;
        }
        if let Some(rate) = lookup("SONGSMITH_SAMPLE_RATE") {
            options.speech_sample_rate = parse_positive("SONGSMITH_SAMPLE_RATE", &rate)?;
        }
        if let Some(channels) = lookup("SONGSMITH_CHANNELS") {
            options.speech_channels = parse_positive("SONGSMITH_CHANNELS", &channels)?;
        }
        Ok(options)
    }
}

fn parse_positive<T>(key: &str, value: &str) -> StudioResult<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|error| StudioError::InvalidInput(format!("{key}={value:?}: {error}")))?;
    if parsed == T::default() {
        return Err(StudioError::InvalidInput(format!("{key} must be positive")));
    }
    Ok(parsed)
}
