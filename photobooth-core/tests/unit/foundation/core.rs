use super::*;

#[test]
fn frame_rejects_empty_and_non_image_payloads() {
    assert!(Frame::new(Vec::new(), "image/png").is_err());
    assert!(Frame::new(vec![1, 2, 3], "video/mp4").is_err());
    Frame::new(vec![1, 2, 3], "image/png").unwrap();
}

#[test]
fn frame_base64_and_preview() {
    let frame = Frame::from_base64("AQID", "image/jpeg").unwrap();
    assert_eq!(frame.data(), &[1, 2, 3]);
    assert_eq!(frame.to_base64(), "AQID");
    assert_eq!(frame.preview().as_str(), "data:image/jpeg;base64,AQID");
    assert!(Frame::from_base64("!!!", "image/jpeg").is_err());
}

#[test]
fn frame_extension_follows_mime() {
    assert_eq!(Frame::new(vec![0], "image/png").unwrap().extension(), "png");
    assert_eq!(Frame::new(vec![0], "image/jpeg").unwrap().extension(), "jpg");
    assert_eq!(Frame::new(vec![0], "image/x-unknown").unwrap().extension(), "bin");
}

#[test]
fn sequence_keeps_insertion_order_and_origin() {
    let a = Frame::new(vec![1], "image/png").unwrap();
    let b = Frame::new(vec![2], "image/png").unwrap();
    let mut seq = FrameSequence::empty(FrameOrigin::Stylized);
    seq.push(a.clone());
    seq.push(b.clone());
    assert_eq!(seq.origin(), FrameOrigin::Stylized);
    assert_eq!(seq.frames(), &[a.clone(), b]);
    assert_eq!(seq.first(), Some(&a));
    seq.clear();
    assert!(seq.is_empty());
}

#[test]
fn raster_checks_buffer_length() {
    assert!(RgbaFrame::new(2, 2, vec![0; 15]).is_err());
    assert!(RgbaFrame::new(0, 2, Vec::new()).is_err());
    let r = RgbaFrame::new(2, 1, vec![0; 8]).unwrap();
    assert_eq!(r.clone().into_image().unwrap().dimensions(), (2, 1));
}
