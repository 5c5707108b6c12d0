use super::*;
use crate::capture::encode::encode_jpeg;
use crate::foundation::core::{Frame, FrameOrigin};
use crate::present::sink::InMemorySink;

fn png(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    Frame::new(out.into_inner(), "image/png").unwrap()
}

#[test]
fn mode_follows_length() {
    let one = png(2, 2, [0, 0, 0, 255]);
    assert_eq!(
        PresentationMode::for_sequence(&FrameSequence::empty(FrameOrigin::Stylized)),
        PresentationMode::Empty
    );
    assert_eq!(
        PresentationMode::for_sequence(&FrameSequence::single(FrameOrigin::Stylized, one.clone())),
        PresentationMode::Single
    );
    assert_eq!(
        PresentationMode::for_sequence(&FrameSequence::from_frames(
            FrameOrigin::Stylized,
            vec![one.clone(), one]
        )),
        PresentationMode::Video
    );
}

#[test]
fn repeats_round_hold_times_fps() {
    let defaults = ClipOpts::default();
    assert_eq!(defaults.hold, Duration::from_millis(100));
    assert_eq!(defaults.fps, 10);
    assert_eq!(defaults.repeats_per_frame(), 1);

    let long = ClipOpts {
        hold: Duration::from_millis(500),
        fps: 30,
    };
    assert_eq!(long.repeats_per_frame(), 15);

    let short = ClipOpts {
        hold: Duration::from_millis(1),
        fps: 10,
    };
    assert_eq!(short.repeats_per_frame(), 1);
}

#[test]
fn clip_keeps_order_and_even_canvas() {
    let seq = FrameSequence::from_frames(
        FrameOrigin::Stylized,
        vec![
            png(5, 3, [255, 0, 0, 255]),
            png(8, 8, [0, 255, 0, 255]),
            png(5, 3, [0, 0, 255, 255]),
        ],
    );
    let mut sink = InMemorySink::new();
    let opts = ClipOpts {
        hold: Duration::from_millis(200),
        fps: 10,
    };

    let stats = assemble_clip(&seq, opts, &mut sink).unwrap();
    assert_eq!((stats.width, stats.height), (4, 2));
    assert_eq!(stats.source_frames, 3);
    assert_eq!(stats.encoded_frames, 6);

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (4, 2, 10));
    assert!(sink.is_finished());

    let frames = sink.frames();
    assert_eq!(frames.len(), 6);
    for (i, (idx, f)) in frames.iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((f.width, f.height), (4, 2));
    }
    let red_green_blue: Vec<_> = frames
        .iter()
        .step_by(2)
        .map(|(_, f)| [f.data[0], f.data[1], f.data[2]])
        .collect();
    assert_eq!(
        red_green_blue,
        vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]
    );
}

#[test]
fn clip_accepts_jpeg_frames() {
    let raster = RgbaFrame::new(4, 4, vec![128; 64]).unwrap();
    let jpeg = encode_jpeg(&raster, 90).unwrap();
    let seq = FrameSequence::from_frames(FrameOrigin::Stylized, vec![jpeg.clone(), jpeg]);
    let mut sink = InMemorySink::new();
    let stats = assemble_clip(&seq, ClipOpts::default(), &mut sink).unwrap();
    assert_eq!(stats.encoded_frames, 2);
}

#[test]
fn empty_or_tiny_input_is_rejected() {
    let mut sink = InMemorySink::new();
    assert!(
        assemble_clip(
            &FrameSequence::empty(FrameOrigin::Stylized),
            ClipOpts::default(),
            &mut sink
        )
        .is_err()
    );
    let tiny = FrameSequence::single(FrameOrigin::Stylized, png(1, 1, [0, 0, 0, 255]));
    assert!(assemble_clip(&tiny, ClipOpts::default(), &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn preview_loops_samples_one_encoder_frame_each() {
    let seq = FrameSequence::from_frames(
        FrameOrigin::VideoSamples,
        vec![png(4, 4, [255, 0, 0, 255]), png(4, 4, [0, 0, 255, 255])],
    );
    let mut sink = InMemorySink::new();
    let stats = assemble_preview(&seq, PreviewOpts { fps: 5, loops: 3 }, &mut sink).unwrap();
    assert_eq!(stats.source_frames, 2);
    assert_eq!(stats.encoded_frames, 6);
    assert_eq!(sink.config().unwrap().fps, 5);

    let reds: Vec<u8> = sink.frames().iter().map(|(_, f)| f.data[0]).collect();
    assert_eq!(reds, vec![255, 0, 255, 0, 255, 0]);
}

#[test]
fn preview_defaults_follow_present_opts() {
    let opts = PreviewOpts::from(&PresentOpts {
        preview_fps: 8,
        ..PresentOpts::default()
    });
    assert_eq!(opts.fps, 8);
    assert_eq!(opts.loops, DEFAULT_PREVIEW_LOOPS);
    assert_eq!(PreviewOpts::default().fps, 5);
}

#[test]
fn preview_rejects_zero_loops_or_fps() {
    let seq = FrameSequence::single(FrameOrigin::VideoSamples, png(2, 2, [0, 0, 0, 255]));
    let mut sink = InMemorySink::new();
    assert!(assemble_preview(&seq, PreviewOpts { fps: 5, loops: 0 }, &mut sink).is_err());
    assert!(assemble_preview(&seq, PreviewOpts { fps: 0, loops: 1 }, &mut sink).is_err());
    assert!(sink.config().is_none());
}
