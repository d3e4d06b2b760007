use msd_core::errors::{DesignError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("position", "7")
        .with_context("reason", "example")
}

#[test]
fn structure_error_surface() {
    let err = DesignError::Structure(sample_info("unbalanced", "closing bracket without a partner"));
    assert_eq!(err.info().code, "unbalanced");
    assert!(err.info().context.contains_key("position"));
}

#[test]
fn sampler_error_surface() {
    let err = DesignError::Sampler(sample_info("unknown-mode", "no such mode"));
    assert_eq!(err.info().code, "unknown-mode");
    assert!(!err.is_timeout());
}

#[test]
fn timeout_error_surface() {
    let err = DesignError::Timeout(ErrorInfo::new("construction-timeout", "deadline passed"));
    assert!(err.is_timeout());
}

#[test]
fn display_includes_context_and_hint() {
    let err = DesignError::Graph(
        sample_info("not-bipartite", "odd cycle").with_hint("check the structures"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("graph error: odd cycle (code: not-bipartite)"));
    assert!(rendered.contains("position=7"));
    assert!(rendered.contains("hint: check the structures"));
}

#[test]
fn errors_round_trip_json() {
    let err = DesignError::Fold(sample_info("missing-sequence", "nothing to fold"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Fold\""));
    let decoded: DesignError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
