use super::*;
use base64::Engine as _;

#[test]
fn content_url_targets_output_folder() {
    assert_eq!(
        content_url("https://api.github.com", "me/art", "art-1.png"),
        "https://api.github.com/repos/me/art/contents/output/art-1.png"
    );
}

#[test]
fn png_frames_are_sent_verbatim() {
    let frame = Frame::new(vec![1, 2, 3], "image/png").unwrap();
    let body = put_body(&frame, "art-7.png").unwrap();
    assert_eq!(body.message, "Add artwork: art-7.png");
    assert_eq!(body.content, "AQID");

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["message"], "Add artwork: art-7.png");
    assert_eq!(json["content"], "AQID");
}

#[test]
fn jpeg_frames_are_converted_to_png() {
    let raster = crate::foundation::core::RgbaFrame::new(2, 2, vec![255; 16]).unwrap();
    let jpeg = crate::capture::encode::encode_jpeg(&raster, 90).unwrap();
    let body = put_body(&jpeg, "art-1.png").unwrap();
    let bytes = STANDARD.decode(body.content).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Png
    );
}

#[test]
fn unconfigured_settings_fail_before_any_request() {
    // Unroutable base: a request would surface as Remote, not Config.
    let up = GitHubUploader::new("http://127.0.0.1:9", Duration::from_millis(200));
    let frame = Frame::new(vec![1], "image/png").unwrap();
    for settings in [
        ExportSettings::default(),
        ExportSettings::new("me/art", ""),
        ExportSettings::new("", "tok"),
    ] {
        assert!(matches!(
            up.upload(&frame, &settings),
            Err(PhotoboothError::Config(_))
        ));
    }
}

#[test]
fn unreachable_api_is_a_remote_error() {
    let up = GitHubUploader::new("http://127.0.0.1:9/", Duration::from_millis(500));
    let frame = Frame::new(vec![1], "image/png").unwrap();
    let err = up
        .upload(&frame, &ExportSettings::new("me/art", "tok"))
        .unwrap_err();
    assert!(matches!(err, PhotoboothError::Remote(_)), "{err:?}");
}
