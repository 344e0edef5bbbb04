use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use podium_types::errors::{AppError, ApplicationError, ErrorKind};

/// Error body, shaped like the one the client already understands.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// An error turned into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput => {
                tracing::debug!("Rejected request: {err}");
                Self::bad_request(err.to_string())
            }
            ErrorKind::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                detail: "User not found".to_string(),
            },
            ErrorKind::Internal => {
                tracing::error!("Request failed: {err}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: "Internal server error.".to_string(),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApplicationError::from(AppError::InvalidRequest(rejection.body_text())).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApplicationError::from(AppError::InvalidRequest(rejection.body_text())).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApplicationError::from(AppError::InvalidRequest(rejection.body_text())).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
