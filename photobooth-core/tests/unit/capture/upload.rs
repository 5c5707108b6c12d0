use std::io::Cursor;
use std::path::PathBuf;

use super::*;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_upload").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn classify_by_extension() {
    assert_eq!(
        classify_upload(Path::new("clip.MP4")).unwrap(),
        UploadKind::Video
    );
    assert_eq!(
        classify_upload(Path::new("photo.jpeg")).unwrap(),
        UploadKind::Image {
            mime_type: "image/jpeg".to_string()
        }
    );
}

#[test]
fn classify_sniffs_content_without_extension() {
    let path = scratch_dir("sniff").join("upload");
    std::fs::write(&path, png_bytes()).unwrap();
    assert_eq!(
        classify_upload(&path).unwrap(),
        UploadKind::Image {
            mime_type: "image/png".to_string()
        }
    );
}

#[test]
fn image_upload_keeps_raw_bytes() {
    let bytes = png_bytes();
    let path = scratch_dir("raw").join("in.png");
    std::fs::write(&path, &bytes).unwrap();

    let seq = load_image_upload(&path).unwrap();
    assert_eq!(seq.origin(), FrameOrigin::Upload);
    assert_eq!(seq.len(), 1);
    assert_eq!(seq.frames()[0].data(), bytes.as_slice());
    assert_eq!(seq.frames()[0].mime_type(), "image/png");
}

#[test]
fn video_upload_is_not_an_image() {
    assert!(load_image_upload(Path::new("clip.webm")).is_err());
}
