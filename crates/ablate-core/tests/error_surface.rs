use ablate_core::errors::{AblateError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("component", "retriever")
        .with_context("line", "3")
}

#[test]
fn validation_error_surface() {
    let err = AblateError::Validation(sample_info("V001", "empty name"));
    assert_eq!(err.info().code, "V001");
    assert!(err.info().context.contains_key("component"));
    assert!(err.is_validation());
}

#[test]
fn serde_error_surface() {
    let err = AblateError::Serde(sample_info("S001", "bad json"));
    assert_eq!(err.info().code, "S001");
    assert!(!err.is_validation());
}

#[test]
fn io_error_surface() {
    let err = AblateError::Io(sample_info("IO001", "missing file").with_hint("check the path"));
    assert_eq!(err.info().hint.as_deref(), Some("check the path"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = AblateError::Validation(
        ErrorInfo::new("config-metrics-empty", "no metrics")
            .with_context("b", "2")
            .with_context("a", "1")
            .with_hint("pass --metrics"),
    );
    assert_eq!(
        err.to_string(),
        "validation error: no metrics (code: config-metrics-empty) | context: [a=1, b=2] | hint: pass --metrics"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = AblateError::validation("run-id-empty", "run_id must not be empty");
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["family"], "Validation");
    assert_eq!(value["detail"]["code"], "run-id-empty");
    let decoded: AblateError = serde_json::from_value(value).expect("deserialize");
    assert_eq!(decoded, err);
}
