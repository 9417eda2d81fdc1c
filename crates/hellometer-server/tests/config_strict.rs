#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use hellometer_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
  shutdown_grace: 100 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.server.shutdown_grace_ms, 5000);
    assert_eq!(cfg.metrics.path, "/actuator/prometheus");
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn listen_must_be_a_socket_addr() {
    let bad = r#"
version: 1
server:
  listen: "localhost"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn metrics_path_may_not_shadow_builtin_routes() {
    for path in ["/healthz", "/api/hello", "metrics", "/"] {
        let yaml = format!("version: 1\nmetrics:\n  path: \"{path}\"\n");
        assert!(config::load_from_str(&yaml).is_err(), "{path} must be rejected");
    }

    let ok = config::load_from_str("version: 1\nmetrics:\n  path: \"/metrics\"\n").expect("ok");
    assert_eq!(ok.metrics.path, "/metrics");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = config::load_from_file("does/not/exist/hellometer.yaml").expect("defaults");
    assert_eq!(cfg.version, 1);
}

#[test]
fn metrics_path_must_be_a_literal_route() {
    for path in ["/metrics/*", "/*rest", "/a/:", "/a/:id", "/a/{id}", "/metrics/", "/a//b"] {
        let yaml = format!("version: 1\nmetrics:\n  path: \"{path}\"\n");
        let err = config::load_from_str(&yaml).expect_err(path);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{path}");
    }

    let ok = config::load_from_str("version: 1\nmetrics:\n  path: \"/internal/prometheus-v1\"\n")
        .expect("nested literal path");
    assert_eq!(ok.metrics.path, "/internal/prometheus-v1");
}

#[test]
fn accepted_metrics_paths_build_a_router() {
    use hellometer_server::{app_state::AppState, router};

    for path in ["/metrics", "/actuator/prometheus", "/a/b/c"] {
        let yaml = format!("version: 1\nmetrics:\n  path: \"{path}\"\n");
        let cfg = config::load_from_str(&yaml).expect("valid");
        let state = AppState::new(cfg).expect("state");
        let _ = router::build_router(state);
    }
}
