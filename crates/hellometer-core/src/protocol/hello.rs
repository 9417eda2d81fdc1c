//! `GET /api/hello` request/response contract.

use serde::{Deserialize, Serialize};

use crate::error::{HellometerError, Result};

pub const DEFAULT_NAME: &str = "JP";
pub const DEFAULT_WORK_MS: i64 = 10;
pub const MIN_WORK_MS: i64 = 0;
pub const MAX_WORK_MS: i64 = 1000;

/// Raw query string parameters, as sent by the caller.
///
/// Both fields stay textual: an empty value (`?workMs=`) means "use the
/// default", the same as leaving the parameter out.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HelloQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "workMs")]
    pub work_ms: Option<String>,
}

/// A request that passed validation. Only this type reaches the handler body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloRequest {
    pub name: String,
    pub work_ms: u32,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

impl HelloQuery {
    pub fn new(name: Option<&str>, work_ms: Option<i64>) -> Self {
        Self {
            name: name.map(str::to_string),
            work_ms: work_ms.map(|v| v.to_string()),
        }
    }

    /// Apply defaults, parse `workMs`, and range-check it.
    ///
    /// A value that is not an integer is a bad request; an integer outside
    /// `[MIN_WORK_MS, MAX_WORK_MS]` is a validation failure.
    pub fn validate(self) -> Result<HelloRequest> {
        let work_ms = match non_empty(self.work_ms) {
            None => DEFAULT_WORK_MS,
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| {
                HellometerError::BadRequest(format!("workMs must be an integer ({raw:?}): {e}"))
            })?,
        };
        if !(MIN_WORK_MS..=MAX_WORK_MS).contains(&work_ms) {
            return Err(HellometerError::Validation {
                field: "workMs",
                msg: format!("must be between {MIN_WORK_MS} and {MAX_WORK_MS} (got {work_ms})"),
            });
        }
        let work_ms = u32::try_from(work_ms)
            .map_err(|e| HellometerError::Internal(format!("workMs conversion: {e}")))?;

        Ok(HelloRequest {
            name: non_empty(self.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            work_ms,
        })
    }
}

/// Success body: `{"message": "Hello <name>!", "workMsRequested": <workMs>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloResponse {
    pub message: String,
    pub work_ms_requested: u32,
}

impl HelloResponse {
    /// Echoes the requested work, never the jittered total.
    pub fn for_request(req: &HelloRequest) -> Self {
        Self {
            message: format!("Hello {}!", req.name),
            work_ms_requested: req.work_ms,
        }
    }
}

/// Error body shared by every rejection path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

impl From<&HellometerError> for ErrorBody {
    fn from(err: &HellometerError) -> Self {
        Self {
            code: err.client_code().as_str().to_string(),
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let req = HelloQuery::default().validate().unwrap();
        assert_eq!(req.name, "JP");
        assert_eq!(req.work_ms, 10);
        assert_eq!(HelloResponse::for_request(&req).message, "Hello JP!");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(HelloQuery::new(None, Some(0)).validate().unwrap().work_ms, 0);
        assert_eq!(HelloQuery::new(None, Some(1000)).validate().unwrap().work_ms, 1000);
    }

    #[test]
    fn out_of_range_is_a_validation_error() {
        for bad in [-1, 1001, i64::MIN, i64::MAX] {
            let err = HelloQuery::new(Some("Ada"), Some(bad)).validate().expect_err("must fail");
            assert_eq!(err.client_code().as_str(), "VALIDATION_FAILED");
        }
    }

    #[test]
    fn response_uses_camel_case_keys() {
        let req = HelloQuery::new(Some("Ada"), Some(25)).validate().unwrap();
        let v = serde_json::to_value(HelloResponse::for_request(&req)).unwrap();
        assert_eq!(v, serde_json::json!({"message": "Hello Ada!", "workMsRequested": 25}));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let q = HelloQuery {
            name: Some(String::new()),
            work_ms: Some(String::new()),
        };
        let req = q.validate().unwrap();
        assert_eq!(HelloResponse::for_request(&req).message, "Hello JP!");
        assert_eq!(req.work_ms, 10);
    }

    #[test]
    fn non_numeric_work_is_a_bad_request() {
        for raw in ["abc", "1.5", "99999999999999999999"] {
            let q = HelloQuery {
                name: None,
                work_ms: Some(raw.to_string()),
            };
            let err = q.validate().expect_err("must fail");
            assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{raw}");
        }
    }
}
