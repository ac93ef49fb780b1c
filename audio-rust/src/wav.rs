use crate::{
    pcm::{self, SampleBuffer, BYTES_PER_SAMPLE},
    AudioContainer, AudioError, AudioResult,
};

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

/// PCM has no fmt extension.
const FMT_CHUNK_SIZE: u32 = 16;
const FORMAT_PCM: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
/// Bytes of the RIFF chunk that precede the sample data, minus the 8-byte
/// RIFF chunk header itself.
const RIFF_OVERHEAD: u32 = 36;

/// The canonical 44-byte header of a 16-bit PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    pub const LEN: usize = 44;

    /// Header for `data_size` bytes of 16-bit PCM.
    ///
    /// # Errors
    ///
    /// [`AudioError::Encoding`] when a derived field overflows its width.
    pub fn pcm16(sample_rate: u32, channel_count: u16, data_size: u32) -> AudioResult<Self> {
        let block_align = pcm::block_align(channel_count).ok_or_else(|| {
            AudioError::Encoding(format!(
                "Block alignment overflows for {channel_count} channels"
            ))
        })?;
        let byte_rate = pcm::byte_rate(sample_rate, channel_count).ok_or_else(|| {
            AudioError::Encoding(format!(
                "Byte rate overflows for {sample_rate} Hz and {channel_count} channels"
            ))
        })?;
        let chunk_size = RIFF_OVERHEAD.checked_add(data_size).ok_or_else(|| {
            AudioError::Encoding(format!(
                "Data size {data_size} does not fit the RIFF chunk size field"
            ))
        })?;

        Ok(Self {
            chunk_size,
            channel_count,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: BITS_PER_SAMPLE,
            data_size,
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        let fields: [&[u8]; 13] = [
            RIFF_TAG,
            &self.chunk_size.to_le_bytes(),
            WAVE_TAG,
            FMT_TAG,
            &FMT_CHUNK_SIZE.to_le_bytes(),
            &FORMAT_PCM.to_le_bytes(),
            &self.channel_count.to_le_bytes(),
            &self.sample_rate.to_le_bytes(),
            &self.byte_rate.to_le_bytes(),
            &self.block_align.to_le_bytes(),
            &self.bits_per_sample.to_le_bytes(),
            DATA_TAG,
            &self.data_size.to_le_bytes(),
        ];

        let mut offset = 0;
        for field in fields {
            out[offset..offset + field.len()].copy_from_slice(field);
            offset += field.len();
        }
        out
    }

    /// Reads the canonical header at the start of `bytes` and checks that the
    /// announced sample data is present.
    ///
    /// # Errors
    ///
    /// [`AudioError::InvalidContainer`] for short input, wrong tags, or a
    /// format other than 16-bit PCM.
    pub fn parse(bytes: &[u8]) -> AudioResult<Self> {
        let mut reader = HeaderReader::new(bytes)?;

        reader.expect_tag(RIFF_TAG)?;
        let chunk_size = reader.u32();
        reader.expect_tag(WAVE_TAG)?;
        reader.expect_tag(FMT_TAG)?;
        let fmt_size = reader.u32();
        if fmt_size != FMT_CHUNK_SIZE {
            return Err(AudioError::InvalidContainer(format!(
                "Unsupported fmt chunk size {fmt_size}"
            )));
        }
        let format = reader.u16();
        if format != FORMAT_PCM {
            return Err(AudioError::InvalidContainer(format!(
                "Unsupported audio format code {format}"
            )));
        }
        let channel_count = reader.u16();
        let sample_rate = reader.u32();
        let byte_rate = reader.u32();
        let block_align = reader.u16();
        let bits_per_sample = reader.u16();
        if bits_per_sample != BITS_PER_SAMPLE {
            return Err(AudioError::InvalidContainer(format!(
                "Unsupported bit depth {bits_per_sample}"
            )));
        }
        reader.expect_tag(DATA_TAG)?;
        let data_size = reader.u32();

        pcm::validate_parameters(sample_rate, channel_count)
            .map_err(|error| AudioError::InvalidContainer(error.to_string()))?;
        let header = Self::pcm16(sample_rate, channel_count, data_size)
            .map_err(|error| AudioError::InvalidContainer(error.to_string()))?;
        if header.chunk_size != chunk_size
            || header.byte_rate != byte_rate
            || header.block_align != block_align
        {
            return Err(AudioError::InvalidContainer(
                "Header fields are inconsistent with the fmt chunk".to_string(),
            ));
        }

        let available = bytes.len() - Self::LEN;
        if usize::try_from(data_size).map_or(true, |size| size > available) {
            return Err(AudioError::InvalidContainer(format!(
                "Data chunk announces {data_size} bytes but {available} are present"
            )));
        }

        Ok(header)
    }

    /// Number of complete frames in the data chunk.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        if self.block_align == 0 {
            return 0;
        }
        (self.data_size / u32::from(self.block_align)) as usize
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }
}

struct HeaderReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> AudioResult<Self> {
        if bytes.len() < WavHeader::LEN {
            return Err(AudioError::InvalidContainer(format!(
                "Expected at least {} header bytes, got {}",
                WavHeader::LEN,
                bytes.len()
            )));
        }
        Ok(Self { bytes, offset: 0 })
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        out
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn expect_tag(&mut self, tag: &[u8; 4]) -> AudioResult<()> {
        let offset = self.offset;
        let found: [u8; 4] = self.take();
        if &found == tag {
            Ok(())
        } else {
            Err(AudioError::InvalidContainer(format!(
                "Expected {:?} at offset {offset}, found {:?}",
                String::from_utf8_lossy(tag),
                String::from_utf8_lossy(&found)
            )))
        }
    }
}

/// Serializes `buffer` as a canonical 16-bit PCM WAV file.
///
/// # Errors
///
/// [`AudioError::Encoding`] when channel lengths differ or the data does not
/// fit the 32-bit size fields.
pub fn encode_wav(buffer: &SampleBuffer) -> AudioResult<AudioContainer> {
    let channels = buffer.channels();
    let frame_count = buffer.frame_count();

    if let Some((index, channel)) = channels
        .iter()
        .enumerate()
        .find(|(_, channel)| channel.len() != frame_count)
    {
        return Err(AudioError::Encoding(format!(
            "Channel {index} has {} samples, expected {frame_count}",
            channel.len()
        )));
    }

    let data_len = frame_count
        .checked_mul(channels.len() * BYTES_PER_SAMPLE)
        .ok_or_else(|| AudioError::Encoding("Sample data length overflows".to_string()))?;
    let data_size = u32::try_from(data_len).map_err(|_| {
        AudioError::Encoding(format!(
            "Sample data of {data_len} bytes does not fit a WAV container"
        ))
    })?;
    let header = WavHeader::pcm16(buffer.sample_rate(), buffer.channel_count(), data_size)?;

    let mut bytes = Vec::with_capacity(WavHeader::LEN + data_len);
    bytes.extend_from_slice(&header.to_bytes());
    for frame in 0..frame_count {
        for channel in channels {
            bytes.extend_from_slice(&quantize_sample(channel[frame]).to_le_bytes());
        }
    }

    Ok(AudioContainer::wav(bytes))
}

/// Converts a normalized sample back to `i16`.
///
/// Negative values scale by 32768 and positive ones by 32767, so `-1.0` and
/// `1.0` land on `i16::MIN` and `i16::MAX` without wrapping, and negative
/// outputs of [`normalize_sample`](crate::normalize_sample) map back to their
/// source. Non-negative samples match `round(s * 32767)` exactly; negative
/// samples may sit one step below it.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quantize_sample(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}
