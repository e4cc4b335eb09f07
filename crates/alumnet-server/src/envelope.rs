//! The JSON response envelope and the error-to-status mapping.
//!
//! Every endpoint answers `{success, message?, token?, data?, errors?}`;
//! failures reuse the same shape with `success: false`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use alumnet_core::error::{AlumnetError, FieldError};

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Bearer session token, present on session-granting responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Field-level validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            token: None,
            data: None,
            errors: None,
        }
    }

    pub fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Handler error: an [`AlumnetError`] carried to the HTTP boundary,
/// where it picks its status code and renders the failure envelope.
#[derive(Debug)]
pub struct ApiError(pub AlumnetError);

impl From<AlumnetError> for ApiError {
    fn from(err: AlumnetError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AlumnetError::Validation { .. }
            | AlumnetError::FieldValidation(_)
            | AlumnetError::Verification(_) => StatusCode::BAD_REQUEST,
            AlumnetError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            AlumnetError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            AlumnetError::NotFound { .. } => StatusCode::NOT_FOUND,
            AlumnetError::AlreadyRegistered { .. } | AlumnetError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            AlumnetError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AlumnetError::Database(_) | AlumnetError::Crypto(_) | AlumnetError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }

        let (message, errors) = match self.0 {
            AlumnetError::FieldValidation(errors) => {
                (Some("Validation failed".to_string()), Some(errors))
            }
            // Internal details stay out of the response body.
            AlumnetError::Database(_) | AlumnetError::Crypto(_) | AlumnetError::Internal(_) => {
                (Some("Internal server error".to_string()), None)
            }
            other => (Some(other.to_string()), None),
        };

        let body = ApiResponse {
            success: false,
            message,
            token: None,
            data: None,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
