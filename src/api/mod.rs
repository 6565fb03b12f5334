//! Response layer - the envelope every operation result is reported in.
//!
//! A transport (HTTP handler, CLI, socket) turns a `Result` from the core into
//! an [`ApiResponse`] and answers with [`ApiResponse::status`]. The JSON body
//! is `{success, message, data?, errors?}`.

pub mod views;

use crate::{errors::Error, validation::FieldError};
use serde::Serialize;
use tracing::error;

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-level violations on a validation failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Status code the transport should answer with
    #[serde(skip)]
    pub status: u16,
}

impl<T> ApiResponse<T> {
    /// `200` response carrying `data`.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            status: 200,
        }
    }

    /// `201` response carrying the created resource.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: 201,
            ..Self::success(data, message)
        }
    }

    /// Error response whose status follows [`Error::status_code`].
    ///
    /// Storage and internal failures are logged in full and reported with a
    /// generic message.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        let status = err.status_code();
        let (message, errors) = match err {
            Error::Validation(failure) => {
                ("Validation failed".to_string(), Some(failure.errors().to_vec()))
            }
            Error::NotFound { .. } | Error::Conflict { .. } | Error::Forbidden { .. } => {
                (err.to_string(), None)
            }
            _ => {
                error!(error = %err, "Request failed");
                ("Internal server error".to_string(), None)
            }
        };
        Self {
            success: false,
            message,
            data: None,
            errors,
            status,
        }
    }

    /// Wraps a core result, using `message` on success.
    pub fn from_result(result: crate::errors::Result<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::success(data, message),
            Err(err) => Self::from_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::validation::ValidationFailure;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(json!({"id": 1}), "Success");
        assert_eq!(response.status, 200);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "message": "Success", "data": {"id": 1}})
        );

        assert_eq!(ApiResponse::created(1, "Created").status, 201);
    }

    #[test]
    fn test_validation_error_envelope() {
        let failure = ValidationFailure::single("end_date", "after_start", "end_date must be after start_date");
        let response: ApiResponse<()> = ApiResponse::from_error(&Error::Validation(failure));

        assert_eq!(response.status, 422);
        assert!(!response.success);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "message": "Validation failed",
                "errors": [{
                    "field": "end_date",
                    "code": "after_start",
                    "message": "end_date must be after start_date"
                }]
            })
        );
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (Error::not_found("Budget", 3), 404, "Budget not found: 3"),
            (
                Error::Conflict {
                    message: "Email already exists".to_string(),
                },
                409,
                "Conflict: Email already exists",
            ),
            (
                Error::Forbidden {
                    message: "Cannot delete default categories".to_string(),
                },
                403,
                "Forbidden: Cannot delete default categories",
            ),
            (
                Error::Internal {
                    message: "disk on fire".to_string(),
                },
                500,
                "Internal server error",
            ),
        ];
        for (err, status, message) in cases {
            let response: ApiResponse<()> = ApiResponse::from_error(&err);
            assert_eq!(response.status, status);
            assert_eq!(response.message, message);
            assert!(response.errors.is_none());
        }
    }

    #[test]
    fn test_from_result() {
        let ok = ApiResponse::from_result(Ok(5), "Fetched");
        assert_eq!(ok.data, Some(5));

        let err: ApiResponse<i32> = ApiResponse::from_result(Err(Error::not_found("User", 9)), "Fetched");
        assert_eq!(err.status, 404);
        assert_eq!(err.data, None);
    }
}
