use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PhotoboothError::auth("x").to_string().contains("auth error:"));
    assert!(
        PhotoboothError::remote("x")
            .to_string()
            .contains("remote error:")
    );
    assert!(
        PhotoboothError::device("x")
            .to_string()
            .contains("device error:")
    );
    assert!(
        PhotoboothError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(PhotoboothError::media("x").to_string().contains("media error:"));
    assert!(
        PhotoboothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PhotoboothError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn batch_aborted_exposes_root_failure() {
    let err = PhotoboothError::BatchAborted {
        index: 2,
        produced: 2,
        source: Box::new(PhotoboothError::auth("key rejected")),
    };
    assert!(err.is_auth());
    assert!(matches!(err.root(), PhotoboothError::Auth(_)));
    let msg = err.to_string();
    assert!(msg.contains("frame 2"));
    assert!(msg.contains("key rejected"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PhotoboothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
