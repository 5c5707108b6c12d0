use super::*;

#[test]
fn descriptor_is_static() {
    let d = service_descriptor();
    assert_eq!(d.service, "photobooth-proxy");
    assert_eq!(d.status, "healthy");
    assert_eq!(d.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn caller_mistakes_are_bad_requests() {
    for err in [
        PhotoboothError::validation("empty"),
        PhotoboothError::serde("bad base64"),
        PhotoboothError::media("bad image"),
    ] {
        assert_eq!(ProxyError::invalid_input(err).status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(
        ProxyError::invalid_input(PhotoboothError::validation("instruction must not be empty"))
            .to_string(),
        "instruction must not be empty"
    );
}

#[test]
fn upstream_auth_failure_hides_the_credential() {
    let err = ProxyError::upstream(PhotoboothError::auth("key AIza-secret rejected"));
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert!(!err.to_string().contains("AIza-secret"));
}

#[test]
fn every_upstream_failure_is_bad_gateway() {
    let err = ProxyError::upstream(PhotoboothError::remote("status 500: boom"));
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(err.to_string(), "status 500: boom");

    for err in [
        PhotoboothError::serde("invalid base64 image payload"),
        PhotoboothError::validation("empty image payload"),
        PhotoboothError::media("unsupported mime type"),
        PhotoboothError::Busy,
    ] {
        assert_eq!(ProxyError::upstream(err).status(), StatusCode::BAD_GATEWAY);
    }
}
