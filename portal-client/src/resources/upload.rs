use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use serde::Serialize;

use portal_api::UploadedFile;

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    file_name: String,
    /// Содержимое файла, base64 (standard alphabet).
    data: String,
}

impl PortalClient {
    /// Загружает файл (обложку статьи, аватар) и возвращает его URL.
    pub async fn upload(&self, file_name: &str, bytes: &[u8]) -> PortalResult<UploadedFile> {
        let payload = UploadRequest {
            file_name: file_name.to_string(),
            data: STANDARD.encode(bytes),
        };
        self.execute(Method::POST, "/protected/upload", Some(&payload), Auth::Bearer)
            .await
    }
}
