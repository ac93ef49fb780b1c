use crate::{base64_utils, AudioResult, WavHeader};
use std::io::Write;

pub const WAV_MIME_TYPE: &str = "audio/wav";

/// An encoded audio file, ready to be served, downloaded or written to disk.
///
/// The container owns its bytes; callers decide how long the resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioContainer {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl AudioContainer {
    pub(crate) fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: WAV_MIME_TYPE,
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The sample data that follows the header.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.bytes.get(WavHeader::LEN..).unwrap_or_default()
    }

    /// Parses the header back out of the container.
    ///
    /// # Errors
    ///
    /// See [`WavHeader::parse`].
    pub fn header(&self) -> AudioResult<WavHeader> {
        WavHeader::parse(&self.bytes)
    }

    /// A self-contained `data:` URL that browsers and players can load
    /// directly.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64_utils::encode_payload(&self.bytes)
        )
    }

    /// Writes the container byte-for-byte.
    ///
    /// # Errors
    ///
    /// Any I/O error raised by `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()
    }
}

impl AsRef<[u8]> for AudioContainer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
