use super::*;

#[test]
fn request_uses_camel_case_fields() {
    let body = StylizeRequestBody {
        image: "AQID".to_string(),
        mime_type: "image/jpeg".to_string(),
        instruction: "make it blue".to_string(),
    };
    let v = serde_json::to_value(&body).unwrap();
    assert_eq!(v["mimeType"], "image/jpeg");
    assert_eq!(v["instruction"], "make it blue");
}

#[test]
fn response_without_image_is_no_output() {
    let body: StylizeResponseBody = serde_json::from_str(r#"{"text":"refused"}"#).unwrap();
    assert_eq!(
        body.into_result().unwrap(),
        StyleResult::NoOutput {
            advisory: Some("refused".to_string())
        }
    );
}

#[test]
fn output_result_maps_to_wire_and_back() {
    let frame = Frame::new(vec![9, 8, 7], "image/png").unwrap();
    let result = StyleResult::Output {
        frame: frame.clone(),
        advisory: None,
    };
    let body = StylizeResponseBody::from_result(&result);
    assert_eq!(body.mime_type.as_deref(), Some("image/png"));
    let json = serde_json::to_string(&body).unwrap();
    assert!(!json.contains("text"));
    assert_eq!(body.into_result().unwrap().frame(), Some(&frame));
}
