use super::*;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/unit_settings");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn missing_file_gives_empty_settings() {
    let s = ExportSettings::load(&scratch("absent.json")).unwrap();
    assert_eq!(s, ExportSettings::default());
    assert!(!s.is_configured());
}

#[test]
fn save_then_load() {
    let path = scratch("nested/settings.json");
    let s = ExportSettings::new(" me/art ", " ghp_x ");
    s.save(&path).unwrap();
    let back = ExportSettings::load(&path).unwrap();
    assert_eq!(back.github_repo, "me/art");
    assert_eq!(back.github_token, "ghp_x");
    assert!(back.is_configured());
}

#[test]
fn half_configured_is_not_configured() {
    assert!(!ExportSettings::new("me/art", "  ").is_configured());
    assert!(!ExportSettings::new("", "tok").is_configured());
}

#[test]
fn debug_hides_token() {
    let text = format!("{:?}", ExportSettings::new("me/art", "secret"));
    assert!(text.contains("me/art"));
    assert!(!text.contains("secret"));
}

#[test]
fn garbage_file_is_a_serde_error() {
    let path = scratch("garbage.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        ExportSettings::load(&path),
        Err(PhotoboothError::Serde(_))
    ));
}
