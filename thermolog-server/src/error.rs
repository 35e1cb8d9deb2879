use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thermolog_core::ServiceError;
use tracing::error;

/// Response-side wrapper that maps [`ServiceError`] onto HTTP statuses.
#[derive(Debug)]
pub(crate) struct ApiError(ServiceError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            // 404s carry no body.
            ServiceError::NotFound { .. } => return StatusCode::NOT_FOUND.into_response(),
            ServiceError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ServiceError::Conflict(message) => (StatusCode::CONFLICT, message),
            ServiceError::Store(err) => {
                error!(error = %err, "Store failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_owned(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
