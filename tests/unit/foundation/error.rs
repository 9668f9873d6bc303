use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrollweaveError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ScrollweaveError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        ScrollweaveError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        ScrollweaveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrollweaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: ScrollweaveError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ScrollweaveError::Serde(_)));
    assert!(!err.is_config());
}
