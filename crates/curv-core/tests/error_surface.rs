use curv_core::errors::{CurvError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("edge", "3")
        .with_context("reason", "example")
}

#[test]
fn graph_error_surface() {
    let err = CurvError::Graph(sample_info("self-loop", "self loops are not supported"));
    assert_eq!(err.code(), "self-loop");
    assert!(err.info().context.contains_key("edge"));
}

#[test]
fn weight_error_surface() {
    let err = CurvError::Weight(sample_info("non-positive-weight", "weight must be positive"));
    assert_eq!(err.info().code, "non-positive-weight");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn transport_error_surface() {
    let err = CurvError::Transport(sample_info("not-converged", "sinkhorn stalled"));
    assert_eq!(err.code(), "not-converged");
}

#[test]
fn display_includes_context_and_hint() {
    let err = CurvError::Config(
        ErrorInfo::new("idleness-range", "idleness outside [0, 1]")
            .with_context("idleness", "1.5")
            .with_hint("use a probability"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: idleness outside [0, 1]"));
    assert!(rendered.contains("idleness=1.5"));
    assert!(rendered.contains("hint: use a probability"));
}

#[test]
fn errors_round_trip_json() {
    let err = CurvError::Serde(sample_info("deserialize-json", "unexpected token"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Serde\""));
    let decoded: CurvError = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, err);
}
