use crate::{AudioError, AudioResult};

/// Bytes per linear16 sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Normalized, deinterleaved audio. Every channel holds `frame_count`
/// samples, each nominally in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Builds a buffer from already-normalized channels.
    ///
    /// Channel lengths are not checked here; the encoder rejects buffers whose
    /// channels disagree.
    ///
    /// # Errors
    ///
    /// [`AudioError::Interpretation`] for a zero sample rate, no channels, or
    /// more channels than a PCM header can describe.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> AudioResult<Self> {
        let channel_count = u16::try_from(channels.len()).map_err(|_| {
            AudioError::Interpretation(format!(
                "Channel count {} does not fit a PCM header",
                channels.len()
            ))
        })?;
        validate_parameters(sample_rate, channel_count)?;
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn channel_count(&self) -> u16 {
        // bounded by validate_parameters at construction
        self.channels.len() as u16
    }

    #[must_use]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Samples per channel, taken from the first channel.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Length in seconds: `frame_count / sample_rate`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    #[must_use]
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

/// Interprets `bytes` as interleaved little-endian signed 16-bit PCM.
///
/// Bytes that do not complete a whole frame are dropped, so
/// `frame_count = floor(bytes.len() / (2 * channel_count))`.
///
/// # Errors
///
/// [`AudioError::Interpretation`] when `sample_rate` or `channel_count` is
/// zero, or the pair overflows the header fields.
pub fn interpret_pcm16(
    bytes: &[u8],
    sample_rate: u32,
    channel_count: u16,
) -> AudioResult<SampleBuffer> {
    validate_parameters(sample_rate, channel_count)?;

    let channel_count = usize::from(channel_count);
    let block_align = channel_count * BYTES_PER_SAMPLE;
    let frame_count = bytes.len() / block_align;

    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();
    for frame in bytes.chunks_exact(block_align) {
        for (channel, sample) in channels
            .iter_mut()
            .zip(frame.chunks_exact(BYTES_PER_SAMPLE))
        {
            channel.push(normalize_sample(i16::from_le_bytes([sample[0], sample[1]])));
        }
    }

    Ok(SampleBuffer {
        sample_rate,
        channels,
    })
}

/// Maps an `i16` onto `[-1.0, 1.0)`; `i16::MIN` lands exactly on `-1.0`.
#[must_use]
pub fn normalize_sample(sample: i16) -> f32 {
    f32::from(sample) / 32768.0
}

/// Rejects parameters that cannot be written into a 16-bit PCM header.
pub(crate) fn validate_parameters(sample_rate: u32, channel_count: u16) -> AudioResult<()> {
    if sample_rate == 0 {
        return Err(AudioError::Interpretation(
            "Sample rate must be positive".to_string(),
        ));
    }
    if channel_count == 0 {
        return Err(AudioError::Interpretation(
            "Channel count must be positive".to_string(),
        ));
    }
    block_align(channel_count).ok_or_else(|| {
        AudioError::Interpretation(format!(
            "Channel count {channel_count} overflows the block alignment field"
        ))
    })?;
    byte_rate(sample_rate, channel_count).ok_or_else(|| {
        AudioError::Interpretation(format!(
            "Sample rate {sample_rate} with {channel_count} channels overflows the byte rate field"
        ))
    })?;
    Ok(())
}

pub(crate) fn block_align(channel_count: u16) -> Option<u16> {
    channel_count.checked_mul(2)
}

pub(crate) fn byte_rate(sample_rate: u32, channel_count: u16) -> Option<u32> {
    sample_rate
        .checked_mul(u32::from(channel_count))
        .and_then(|rate| rate.checked_mul(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::pcm_bytes;

    #[test]
    fn interprets_boundary_values() {
        let buffer = interpret_pcm16(&[0x00, 0x80, 0x00, 0x00], 24_000, 1).unwrap();

        assert_eq!(buffer.channel(0).unwrap(), &[-1.0, 0.0]);
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.duration(), 2.0 / 24_000.0);
    }

    #[test]
    fn normalizes_max_positive_below_one() {
        let value = normalize_sample(i16::MAX);
        assert!(value < 1.0);
        assert!((value - 0.999_969).abs() < 1e-6);
    }

    #[test]
    fn deinterleaves_stereo_frames() {
        let bytes = pcm_bytes(&[100, -100, 200, -200]);
        let buffer = interpret_pcm16(&bytes, 48_000, 2).unwrap();

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(
            buffer.channel(0).unwrap(),
            &[normalize_sample(100), normalize_sample(200)]
        );
        assert_eq!(
            buffer.channel(1).unwrap(),
            &[normalize_sample(-100), normalize_sample(-200)]
        );
    }

    #[test]
    fn drops_trailing_odd_byte() {
        let mut bytes = pcm_bytes(&[1, 2, 3, 4, 5, 6]);
        bytes.push(0x7f);

        let buffer = interpret_pcm16(&bytes, 8_000, 2).unwrap();
        assert_eq!(buffer.frame_count(), 3);
    }

    #[test]
    fn drops_incomplete_trailing_frame() {
        // three samples cannot fill two stereo frames
        let bytes = pcm_bytes(&[1, 2, 3]);
        let buffer = interpret_pcm16(&bytes, 8_000, 2).unwrap();

        assert_eq!(buffer.frame_count(), 1);
        assert_eq!(buffer.channel(1).unwrap().len(), 1);
    }

    #[test]
    fn empty_bytes_yield_empty_channels() {
        let buffer = interpret_pcm16(&[], 24_000, 3).unwrap();

        assert_eq!(buffer.channels().len(), 3);
        assert_eq!(buffer.frame_count(), 0);
        assert_eq!(buffer.duration(), 0.0);
    }

    #[test]
    fn frame_count_follows_duration_law() {
        for channel_count in 1u16..=4 {
            for len in 0..40usize {
                let bytes = vec![0u8; len];
                let buffer = interpret_pcm16(&bytes, 16_000, channel_count).unwrap();
                let block = usize::from(channel_count) * 2;
                let used = buffer.frame_count() * block;

                assert!(used <= len);
                assert!(len < used + block);
            }
        }
    }

    #[test]
    fn rejects_zero_parameters() {
        assert!(matches!(
            interpret_pcm16(&[0, 0], 0, 1),
            Err(AudioError::Interpretation(_))
        ));
        assert!(matches!(
            interpret_pcm16(&[0, 0], 24_000, 0),
            Err(AudioError::Interpretation(_))
        ));
    }

    #[test]
    fn rejects_parameters_that_overflow_the_header() {
        assert!(matches!(
            interpret_pcm16(&[], 24_000, u16::MAX),
            Err(AudioError::Interpretation(_))
        ));
        assert!(matches!(
            interpret_pcm16(&[], u32::MAX, 1),
            Err(AudioError::Interpretation(_))
        ));
    }

    #[test]
    fn from_channels_rejects_empty_channel_list() {
        assert!(matches!(
            SampleBuffer::from_channels(24_000, Vec::new()),
            Err(AudioError::Interpretation(_))
        ));
    }
}
