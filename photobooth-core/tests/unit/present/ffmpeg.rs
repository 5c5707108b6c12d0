use super::*;

#[test]
fn config_validation_catches_bad_values() {
    let ok = SinkConfig {
        width: 10,
        height: 10,
        fps: 10,
    };
    validate_sink_config(&ok).unwrap();
    assert!(validate_sink_config(&SinkConfig { width: 0, ..ok.clone() }).is_err());
    assert!(validate_sink_config(&SinkConfig { width: 11, ..ok.clone() }).is_err());
    assert!(validate_sink_config(&SinkConfig { fps: 0, ..ok }).is_err());
}

#[test]
fn flatten_straight_over_black() {
    // Straight red @ 50% alpha => rgb becomes 128,0,0 over black.
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [0, 0, 0]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_alpha_0_returns_bg() {
    let src = vec![200u8, 100, 50, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0]).is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/never.mp4"));
    let frame = RgbaFrame::new(2, 2, vec![0; 16]).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
