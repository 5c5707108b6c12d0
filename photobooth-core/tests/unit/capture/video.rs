use super::*;

struct FakeDecoder {
    duration: f64,
    seeks: Vec<f64>,
    fail_at: Option<usize>,
}

impl FakeDecoder {
    fn new(duration: f64) -> Self {
        Self {
            duration,
            seeks: Vec::new(),
            fail_at: None,
        }
    }
}

impl VideoDecoder for FakeDecoder {
    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn frame_at(&mut self, time_secs: f64) -> PhotoboothResult<RgbaFrame> {
        if self.fail_at == Some(self.seeks.len()) {
            return Err(PhotoboothError::media("corrupt packet"));
        }
        self.seeks.push(time_secs);
        // Encode the sample position in the pixel value so order survives the JPEG round trip.
        let v = (self.seeks.len() * 40).min(255) as u8;
        RgbaFrame::new(8, 8, vec![v; 8 * 8 * 4])
    }
}

#[test]
fn sample_count_clamps_non_positive() {
    assert_eq!(SampleCount::new(0).get(), 1);
    assert_eq!(SampleCount::new(-5).get(), 1);
    assert_eq!(SampleCount::new(7).get(), 7);
    assert_eq!(SampleCount::default().get(), 10);
}

#[test]
fn timestamps_are_uniform_from_zero() {
    let ts = sample_timestamps(9.0, SampleCount::new(3)).unwrap();
    assert_eq!(ts, vec![0.0, 3.0, 6.0]);

    let ts = sample_timestamps(2.5, SampleCount::new(10)).unwrap();
    assert_eq!(ts.len(), 10);
    for (i, t) in ts.iter().enumerate() {
        assert!((t - i as f64 * 0.25).abs() < 1e-12);
    }
}

#[test]
fn zero_or_invalid_duration_is_a_media_error() {
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            sample_timestamps(d, SampleCount::new(3)),
            Err(PhotoboothError::Media(_))
        ));
    }
}

#[test]
fn sample_video_seeks_in_ascending_order() {
    let mut dec = FakeDecoder::new(9.0);
    let seq = sample_video(&mut dec, SampleCount::new(3), 85).unwrap();
    assert_eq!(dec.seeks, vec![0.0, 3.0, 6.0]);
    assert_eq!(seq.origin(), FrameOrigin::VideoSamples);
    assert_eq!(seq.len(), 3);

    let lumas: Vec<u8> = seq
        .frames()
        .iter()
        .map(|f| f.decode_rgba().unwrap().data[0])
        .collect();
    assert!(lumas.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn zero_duration_video_produces_no_frames() {
    let mut dec = FakeDecoder::new(0.0);
    assert!(sample_video(&mut dec, SampleCount::new(3), 85).is_err());
    assert!(dec.seeks.is_empty());
}

#[test]
fn decode_failure_aborts_sampling() {
    let mut dec = FakeDecoder::new(4.0);
    dec.fail_at = Some(1);
    let err = sample_video(&mut dec, SampleCount::new(4), 85).unwrap_err();
    assert!(matches!(err, PhotoboothError::Media(_)));
}

fn stream_metadata(stream_extra: &str) -> String {
    format!(
        r#"{{
            "streams": [
                {{ "codec_type": "audio", "duration": "9.1" }},
                {{ "codec_type": "video", "width": 1920, "height": 1080, "duration": "8.9"{stream_extra} }}
            ],
            "format": {{ "duration": "9.000000" }}
        }}"#
    )
}

#[test]
fn stored_size_is_kept_without_rotation() {
    let info = parse_stream_metadata(Path::new("clip.mp4"), stream_metadata("").as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
    assert_eq!(info.duration_secs, 9.0);
    assert_eq!(info.source_path, PathBuf::from("clip.mp4"));
}

#[test]
fn quarter_turn_display_matrix_swaps_dimensions() {
    let rotated = r#", "side_data_list": [ { "side_data_type": "Display Matrix", "rotation": -90 } ]"#;
    let info = parse_stream_metadata(Path::new("portrait.mov"), stream_metadata(rotated).as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (1080, 1920));
}

#[test]
fn legacy_rotate_tag_swaps_dimensions() {
    let info = parse_stream_metadata(
        Path::new("portrait.mp4"),
        stream_metadata(r#", "tags": { "rotate": "270" }"#).as_bytes(),
    )
    .unwrap();
    assert_eq!((info.width, info.height), (1080, 1920));

    let upside_down = parse_stream_metadata(
        Path::new("flipped.mp4"),
        stream_metadata(r#", "tags": { "rotate": "180" }"#).as_bytes(),
    )
    .unwrap();
    assert_eq!((upside_down.width, upside_down.height), (1920, 1080));
}

#[test]
fn metadata_without_video_stream_is_a_media_error() {
    let json = br#"{ "streams": [ { "codec_type": "audio" } ] }"#;
    assert!(matches!(
        parse_stream_metadata(Path::new("song.m4a"), json),
        Err(PhotoboothError::Media(_))
    ));
}
