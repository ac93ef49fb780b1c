use songsmith_audio::AudioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the provider was unexpected (e.g. no candidates or
    /// no inline audio in a speech response).
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// The speech payload could not be turned into playable audio.
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}

pub type StudioResult<T> = Result<T, StudioError>;
