use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(SceneError::validation("x").to_string().contains("validation error:"));
    assert!(SceneError::layout("x").to_string().contains("layout error:"));
    assert!(SceneError::authoring("x").to_string().contains("authoring error:"));
    assert!(SceneError::render("x").to_string().contains("render error:"));
    assert!(SceneError::encode("x").to_string().contains("encode error:"));
    assert!(SceneError::serde("x").to_string().contains("serialization error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SceneError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_become_serde_errors() {
    let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: SceneError = bad.into();
    assert!(matches!(err, SceneError::Serde(_)));
}
