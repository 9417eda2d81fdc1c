//! Shared error type across hellometer crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// A parameter is well-formed but outside its allowed range.
    ValidationFailed,
    /// Invalid input / malformed request.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::ValidationFailed => "VALIDATION_FAILED",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Whether the caller is at fault (maps to a 4xx on HTTP surfaces).
    pub fn is_client_error(self) -> bool {
        !matches!(self, ClientCode::Internal)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HellometerError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum HellometerError {
    #[error("validation failed: {field} {msg}")]
    Validation { field: &'static str, msg: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl HellometerError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            HellometerError::Validation { .. } => ClientCode::ValidationFailed,
            HellometerError::BadRequest(_) => ClientCode::BadRequest,
            HellometerError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            HellometerError::Internal(_) => ClientCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_field() {
        let err = HellometerError::Validation {
            field: "workMs",
            msg: "must be between 0 and 1000".into(),
        };
        assert_eq!(err.to_string(), "validation failed: workMs must be between 0 and 1000");
        assert_eq!(err.client_code().as_str(), "VALIDATION_FAILED");
        assert!(err.client_code().is_client_error());
    }

    #[test]
    fn internal_is_not_a_client_error() {
        let err = HellometerError::Internal("boom".into());
        assert!(!err.client_code().is_client_error());
    }
}
