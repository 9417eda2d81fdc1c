//! HTTP mapping of `HellometerError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use hellometer_core::error::HellometerError;
use hellometer_core::protocol::hello::ErrorBody;

/// Wrapper so the shared error can be returned straight from handlers.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub HellometerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.client_code().is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::from(&self.0))).into_response()
    }
}
