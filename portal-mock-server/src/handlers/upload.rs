use axum::http::StatusCode;
use axum::{Json, extract::State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use portal_api::{ApiResponse, UploadedFile};

use crate::error::{AppError, AppResult};
use crate::handlers::ok;
use crate::state::{AppState, slugify};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadRequest {
    file_name: String,
    /// File content, base64 (standard alphabet).
    data: String,
}

pub(crate) async fn upload(
    State(state): State<AppState>,
    Json(input): Json<UploadRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadedFile>>)> {
    if input.file_name.trim().is_empty() {
        return Err(AppError::BadRequest("file name must not be empty".to_string()));
    }
    let bytes = STANDARD
        .decode(&input.data)
        .map_err(|_| AppError::BadRequest("file data is not valid base64".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("file must not be empty".to_string()));
    }

    let id = state.db.lock().expect("db lock poisoned").next_id();
    let uploaded = UploadedFile {
        url: format!("https://cdn.example.com/{id}-{}", slugify(&input.file_name)),
    };
    Ok(ok(StatusCode::CREATED, "file uploaded", uploaded))
}
