//! Per-request server timing (`http_server_requests_seconds`).

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tokio::time::Instant;

use crate::app_state::AppState;

pub const HTTP_REQUESTS_TIMER: &str = "http_server_requests_seconds";
pub const HTTP_REQUESTS_HELP: &str = "Duration of HTTP server request handling";

/// Status class label.
pub fn outcome(status: StatusCode) -> &'static str {
    if status.is_informational() {
        "INFORMATIONAL"
    } else if status.is_success() {
        "SUCCESS"
    } else if status.is_redirection() {
        "REDIRECTION"
    } else if status.is_client_error() {
        "CLIENT_ERROR"
    } else if status.is_server_error() {
        "SERVER_ERROR"
    } else {
        "UNKNOWN"
    }
}

/// Middleware: time the inner service and record by route template.
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    // route template, never the raw path, to keep label cardinality bounded
    let uri = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let started = Instant::now();
    let resp = next.run(req).await;
    let status = resp.status();

    app.http_requests().record(
        &[
            ("method", method.as_str()),
            ("uri", uri.as_str()),
            ("status", status.as_str()),
            ("outcome", outcome(status)),
        ],
        started.elapsed(),
    );
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_by_status_class() {
        assert_eq!(outcome(StatusCode::OK), "SUCCESS");
        assert_eq!(outcome(StatusCode::BAD_REQUEST), "CLIENT_ERROR");
        assert_eq!(outcome(StatusCode::SERVICE_UNAVAILABLE), "SERVER_ERROR");
        assert_eq!(outcome(StatusCode::MOVED_PERMANENTLY), "REDIRECTION");
        assert_eq!(outcome(StatusCode::CONTINUE), "INFORMATIONAL");
    }
}
