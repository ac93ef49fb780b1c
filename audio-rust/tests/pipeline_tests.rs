use songsmith_audio::{
    decode_payload, encode_payload, encode_wav, interpret_pcm16, render_speech, AudioError,
    SampleBuffer, SpeechPayload, WavHeader,
};

fn samples_to_payload(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    encode_payload(&bytes)
}

#[test]
fn renders_mono_boundary_scenario() {
    let payload = SpeechPayload::new(encode_payload(&[0x00, 0x80, 0x00, 0x00]), 24_000, 1);

    let rendered = render_speech(&payload).unwrap();
    let bytes = rendered.container.as_bytes();

    assert_eq!(rendered.frame_count, 2);
    assert_eq!(rendered.duration, 2.0 / 24_000.0);
    assert_eq!(bytes.len(), 48);
    assert_eq!(&bytes[4..8], &40u32.to_le_bytes());
    assert_eq!(&bytes[40..44], &4u32.to_le_bytes());
    assert_eq!(&bytes[44..], &[0x00, 0x80, 0x00, 0x00]);
    assert_eq!(rendered.container.mime_type(), "audio/wav");
}

#[test]
fn renders_empty_payload_as_bare_header() {
    let rendered = render_speech(&SpeechPayload::new("", 24_000, 1)).unwrap();
    let header = rendered.container.header().unwrap();

    assert_eq!(rendered.frame_count, 0);
    assert_eq!(rendered.duration, 0.0);
    assert_eq!(rendered.container.len(), WavHeader::LEN);
    assert_eq!(header.data_size, 0);
    assert_eq!(header.chunk_size, 36);
}

#[test]
fn header_round_trips_encoding_parameters() {
    for (sample_rate, channel_count) in [(8_000u32, 1u16), (24_000, 1), (44_100, 2), (48_000, 6)] {
        let frames = 5usize;
        let channels = (0..channel_count)
            .map(|c| {
                (0..frames)
                    .map(|f| (f as f32 - c as f32) / 10.0)
                    .collect::<Vec<f32>>()
            })
            .collect();
        let buffer = SampleBuffer::from_channels(sample_rate, channels).unwrap();

        let container = encode_wav(&buffer).unwrap();
        let header = WavHeader::parse(container.as_bytes()).unwrap();

        assert_eq!(header.sample_rate, sample_rate);
        assert_eq!(header.channel_count, channel_count);
        assert_eq!(
            header.data_size as usize,
            frames * usize::from(channel_count) * 2
        );
        assert_eq!(header.duration(), buffer.duration());
    }
}

#[test]
fn rendering_is_deterministic() {
    let samples: Vec<i16> = (0..480).map(|i| ((i * 137) % 65_536 - 32_768) as i16).collect();
    let payload = SpeechPayload::new(samples_to_payload(&samples), 24_000, 2);

    let first = render_speech(&payload).unwrap();
    let second = render_speech(&payload).unwrap();

    assert_eq!(first.container.as_bytes(), second.container.as_bytes());
    assert_eq!(first.duration, second.duration);
}

#[test]
fn pcm_survives_the_full_pipeline() {
    let samples = [i16::MIN, -12_345, -1, 0, 1, 42, 12_345];
    let payload = SpeechPayload::new(samples_to_payload(&samples), 16_000, 1);

    let rendered = render_speech(&payload).unwrap();
    let decoded: Vec<i16> = rendered
        .container
        .data()
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    assert_eq!(decoded, samples);
}

#[test]
fn stereo_payload_is_deinterleaved() {
    let bytes = decode_payload(&samples_to_payload(&[10, -10, 20, -20])).unwrap();
    let buffer = interpret_pcm16(&bytes, 24_000, 2).unwrap();

    assert_eq!(buffer.channel(0).unwrap().len(), 2);
    assert!(buffer.channel(0).unwrap().iter().all(|s| *s > 0.0));
    assert!(buffer.channel(1).unwrap().iter().all(|s| *s < 0.0));
}

#[test]
fn odd_trailing_byte_is_discarded() {
    let mut bytes: Vec<u8> = [5i16, 6, 7, 8].iter().flat_map(|s| s.to_le_bytes()).collect();
    bytes.push(0xaa);

    let rendered = render_speech(&SpeechPayload::new(encode_payload(&bytes), 24_000, 2)).unwrap();

    assert_eq!(rendered.frame_count, 2);
    assert_eq!(rendered.container.data(), &bytes[..8]);
}

#[test]
fn reports_each_failure_kind() {
    assert!(matches!(
        render_speech(&SpeechPayload::new("not base64!", 24_000, 1)),
        Err(AudioError::Decode(_))
    ));
    assert!(matches!(
        render_speech(&SpeechPayload::new("AAAA", 0, 1)),
        Err(AudioError::Interpretation(_))
    ));

    let uneven = SampleBuffer::from_channels(24_000, vec![vec![0.0], vec![]]).unwrap();
    assert!(matches!(encode_wav(&uneven), Err(AudioError::Encoding(_))));
}

#[test]
fn payload_deserializes_from_camel_case_json() {
    let payload: SpeechPayload =
        serde_json::from_str(r#"{"data":"AIAAAA==","sampleRate":24000,"channels":1}"#).unwrap();

    assert_eq!(payload, SpeechPayload::new("AIAAAA==", 24_000, 1));
}
