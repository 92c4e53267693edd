//! Shared `AppError -> HTTP response` mapping, used by every route module.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn status_of(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::LimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn app_error_response(err: AppError) -> Response {
    let status = status_of(&err);
    if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
        tracing::error!(error_code = err.error_code(), error = %err, "request failed");
    }
    let body = ErrorBody { error: err.error_code(), message: err.to_string() };
    (status, Json(body)).into_response()
}
