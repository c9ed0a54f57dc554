use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use portal_api::ApiResponse;

pub(crate) mod articles;
pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod comments;
pub(crate) mod tags;
pub(crate) mod upload;
pub(crate) mod users;

/// Wraps payload into the uniform response envelope.
pub(crate) fn ok<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (status, Json(ApiResponse::ok(status.as_u16(), message, data)))
}

/// Success acknowledgement without payload.
pub(crate) fn ack(
    status: StatusCode,
    message: &str,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse {
        status_code: status.as_u16(),
        success: true,
        message: message.to_string(),
        data: None,
    };
    (status, Json(body))
}
