use super::*;

#[test]
fn style_prompt_wraps_label() {
    assert_eq!(
        Instruction::style(" Watercolor Painting ").prompt(),
        "Transform this image into a Watercolor Painting style. Preserve the main subject."
    );
}

#[test]
fn edit_prompt_is_verbatim_text() {
    assert_eq!(
        Instruction::edit("  add a red hat ").prompt(),
        "add a red hat"
    );
}

#[test]
fn blank_instructions_are_rejected() {
    assert!(Instruction::edit("   ").validate().is_err());
    assert!(Instruction::style("").validate().is_err());
    Instruction::edit("x").validate().unwrap();
}

#[test]
fn style_result_accessors() {
    let frame = Frame::new(vec![1], "image/png").unwrap();
    let out = StyleResult::Output {
        frame: frame.clone(),
        advisory: Some("done".to_string()),
    };
    assert_eq!(out.frame(), Some(&frame));
    assert_eq!(out.advisory(), Some("done"));

    let none = StyleResult::NoOutput { advisory: None };
    assert_eq!(none.frame(), None);
    assert_eq!(none.advisory(), None);
}

#[test]
fn direct_without_key_fails_credential_check() {
    let cfg = StylizeConfig {
        endpoint: StylizeEndpoint::Direct {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some(String::new()),
        },
        ..StylizeConfig::default()
    };
    let stylizer = build_stylizer(&cfg);
    assert!(matches!(
        stylizer.check_credentials(),
        Err(PhotoboothError::Auth(_))
    ));
}

#[test]
fn proxy_needs_no_client_credential() {
    let cfg = StylizeConfig {
        endpoint: StylizeEndpoint::Proxy {
            base_url: "http://127.0.0.1:9".to_string(),
        },
        ..StylizeConfig::default()
    };
    build_stylizer(&cfg).check_credentials().unwrap();
}
