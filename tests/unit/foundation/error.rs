use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrubError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScrubError::load(2, "x")
            .to_string()
            .contains("frame load error: frame 2")
    );
    assert!(ScrubError::not_ready("x").to_string().contains("not ready:"));
    assert!(
        ScrubError::IndexOutOfRange { index: 9, count: 3 }
            .to_string()
            .contains("frame index out of range: 9")
    );
    assert_eq!(ScrubError::Cancelled.to_string(), "load cancelled");
    assert!(ScrubError::render("x").to_string().contains("render error:"));
    assert!(
        ScrubError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrubError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
