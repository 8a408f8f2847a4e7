//! Error envelopes.
//!
//! Every failure leaves the service as one of three JSON shapes:
//!
//! | kind         | HTTP | `status_code` |
//! |--------------|------|---------------|
//! | bad request  | 400  | `XC400`       |
//! | validation   | 422  | `XC400`       |
//! | internal     | 500  | `XC500`       |

use crate::db::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

pub const BAD_REQUEST_CODE: &str = "XC400";
pub const INTERNAL_ERROR_CODE: &str = "XC500";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client mistake reported with a short message only.
    #[error("{0}")]
    BadRequest(String),

    /// Body failed the rule table, one entry per offending field.
    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Anything else, the detail is returned in `error_details`.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap a lower level failure the way every handler boundary does.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{INTERNAL_ERROR_MESSAGE}: {detail}"))
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(detail) => {
                warn!(status_code = BAD_REQUEST_CODE, "Bad request: {}", detail);
                json!({
                    "status": false,
                    "status_code": BAD_REQUEST_CODE,
                    "status_message": detail,
                })
            }
            Self::Validation(errors) => {
                warn!(
                    status_code = BAD_REQUEST_CODE,
                    "Validation failed for {} field(s)",
                    errors.len()
                );
                json!({
                    "status": "F",
                    "status_code": BAD_REQUEST_CODE,
                    "status_message": VALIDATION_ERROR_MESSAGE,
                    "http_code": status.as_u16(),
                    "error_details": errors,
                })
            }
            Self::Internal(detail) => {
                error!(status_code = INTERNAL_ERROR_CODE, "{}", detail);
                json!({
                    "status": false,
                    "status_code": INTERNAL_ERROR_CODE,
                    "status_message": INTERNAL_ERROR_MESSAGE,
                    "error_details": detail,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
