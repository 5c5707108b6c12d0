use super::*;
use crate::foundation::core::{Frame, FrameOrigin};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/unit_download").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn single_frame_keeps_its_encoding() {
    let dir = scratch("single");
    let frame = Frame::new(vec![0x89, b'P', b'N', b'G'], "image/png").unwrap();
    let seq = FrameSequence::single(FrameOrigin::Stylized, frame);

    let saved = save_output(&seq, &dir, ClipOpts::default()).unwrap();
    let SavedOutput::Image(path) = &saved else {
        panic!("expected an image, got {saved:?}");
    };
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("art-"), "{name}");
    assert!(name.ends_with(".png"), "{name}");
    assert_eq!(std::fs::read(saved.path()).unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[test]
fn empty_output_is_rejected() {
    let dir = scratch("empty");
    assert!(matches!(
        save_output(&FrameSequence::empty(FrameOrigin::Stylized), &dir, ClipOpts::default()),
        Err(PhotoboothError::Validation(_))
    ));
    assert!(!dir.exists());
}

#[test]
fn empty_preview_is_rejected() {
    let dir = scratch("preview_empty");
    assert!(matches!(
        save_preview(&FrameSequence::empty(FrameOrigin::VideoSamples), &dir, PreviewOpts::default()),
        Err(PhotoboothError::Validation(_))
    ));
    assert!(!dir.exists());
}
