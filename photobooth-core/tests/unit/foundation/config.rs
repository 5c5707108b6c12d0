use super::*;

#[test]
fn defaults_match_capture_and_present_constants() {
    let cfg = PhotoboothConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.capture.sample_count, 10);
    assert_eq!(cfg.capture.photo_jpeg_quality, 95);
    assert_eq!(cfg.capture.sample_jpeg_quality, 85);
    assert_eq!(cfg.present.frame_hold_ms, 100);
    assert_eq!(cfg.present.fps, 10);
    assert_eq!(cfg.stylize.model, DEFAULT_MODEL);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = PhotoboothConfig::from_json_str(
        r#"{
            "stylize": { "endpoint": { "mode": "proxy", "base_url": "http://127.0.0.1:8080" } },
            "capture": { "sample_count": 3 }
        }"#,
    )
    .unwrap();
    assert_eq!(
        cfg.stylize.endpoint,
        StylizeEndpoint::Proxy {
            base_url: "http://127.0.0.1:8080".to_string()
        }
    );
    assert_eq!(cfg.capture.sample_count, 3);
    assert_eq!(cfg.capture.sample_jpeg_quality, 85);
    assert_eq!(cfg.stylize.resolve_api_key(), None);
}

#[test]
fn direct_endpoint_defaults_base_url() {
    let cfg = PhotoboothConfig::from_json_str(
        r#"{ "stylize": { "endpoint": { "mode": "direct", "api_key": "k" } } }"#,
    )
    .unwrap();
    assert_eq!(
        cfg.stylize.endpoint,
        StylizeEndpoint::Direct {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: Some("k".to_string()),
        }
    );
    assert_eq!(cfg.stylize.resolve_api_key().as_deref(), Some("k"));
}

#[test]
fn blank_inline_key_counts_as_missing() {
    let cfg = StylizeConfig {
        endpoint: StylizeEndpoint::Direct {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: Some("   ".to_string()),
        },
        ..StylizeConfig::default()
    };
    assert_eq!(cfg.resolve_api_key(), None);
}

#[test]
fn validation_rejects_bad_values() {
    let mut cfg = PhotoboothConfig::default();
    cfg.capture.photo_jpeg_quality = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PhotoboothConfig::default();
    cfg.present.fps = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PhotoboothConfig::default();
    cfg.export.pdf_margin_mm = -1.0;
    assert!(cfg.validate().is_err());

    assert!(PhotoboothConfig::from_json_str(r#"{ "nope": 1 }"#).is_err());
}

#[test]
fn explicit_settings_path_wins() {
    let opts = ExportOpts {
        settings_path: Some(PathBuf::from("target/x/settings.json")),
        ..ExportOpts::default()
    };
    assert_eq!(
        opts.resolved_settings_path(),
        PathBuf::from("target/x/settings.json")
    );
    assert!(
        ExportOpts::default()
            .resolved_settings_path()
            .ends_with("photobooth/settings.json")
    );
}
