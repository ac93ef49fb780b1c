use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    /// The payload is not valid standard base64 (bad characters or padding).
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    /// The operational parameters cannot describe a PCM stream
    /// (e.g. a zero sample rate or channel count).
    #[error("Interpretation error: {0}")]
    Interpretation(String),
    /// A sample buffer broke one of its own invariants, such as channels of
    /// different lengths. This points at a defect upstream of the encoder.
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// The bytes are not a canonical 16-bit PCM WAV container.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),
}

pub type AudioResult<T> = Result<T, AudioError>;
