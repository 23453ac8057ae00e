//! Conversion of [`AppError`] into HTTP responses.
//!
//! Bodies follow [`ErrorResponse`]. Store and driver details are logged
//! where they occur and never copied into a body.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, RequestId::current().map(|id| id.0))
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Read { .. }
        | AppError::Write { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Connection { .. } | AppError::ConnectionPool { .. } | AppError::Cancelled { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AppError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Read { .. } | AppError::Write { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Connection { .. } | AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Cancelled { .. } => "CANCELLED",
        AppError::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound { entity, field, value } => ErrorResponse::new(
            code,
            &format!("{} with {} '{}' not found", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field, "value": value })),
        AppError::Duplicate { entity, field, value } => ErrorResponse::new(
            code,
            &format!("{} with {} '{}' already exists", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field })),
        AppError::Validation { field, reason } => {
            ErrorResponse::new(code, &format!("Invalid value for {}: {}", field, reason))
                .with_details(json!({ "field": field }))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, "Request validation failed").with_details(json!({ "fields": errors }))
        }
        AppError::BadRequest { message } => ErrorResponse::new(code, message),
        AppError::Read { entity, operation, .. } | AppError::Write { entity, operation, .. } => {
            ErrorResponse::new(code, "Database operation failed")
                .with_details(json!({ "entity": entity, "operation": operation }))
        }
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, "Configuration error").with_details(json!({ "key": key }))
        }
        AppError::Connection { .. } | AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Cancelled { operation } => {
            ErrorResponse::new(code, "Operation cancelled").with_details(json!({ "operation": operation }))
        }
        AppError::DeadlineExceeded { operation } => ErrorResponse::new(code, "Operation timed out")
            .with_details(json!({ "operation": operation })),
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

/// Builds the HTTP response for `error`, tagging the body with `request_id`.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let status = error_to_status_code(&error);
    let mut body = error_body(&error);

    if status.is_server_error() {
        tracing::error!(error = %error, source = ?std::error::Error::source(&error), "Request failed");
    }

    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

/// Router fallback for paths no route matches.
pub async fn not_found_fallback(uri: Uri) -> Response {
    let mut body = ErrorResponse::new("NOT_FOUND", &format!("No route for {}", uri.path()));
    if let Some(id) = RequestId::current() {
        body = body.with_request_id(&id.0);
    }
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
