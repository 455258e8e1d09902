//! Handler functions for admin image uploads.
//!
//! Uploaded files land under the configured upload directory and are served
//! back over the static `/uploads` route.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::config::Config;
use crate::errors::ServiceError;
use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::Json as ResponseJson,
};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Upload size cap, enforced on top of the router body limit.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/webp", ".webp"),
];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL the frontend stores in `cover_image`
    pub url: String,
    pub filename: String,
    pub original_name: String,
}

/// Accepts a multipart post-cover upload. PNG, JPEG, and WebP only, capped
/// at 5 MiB.
#[axum::debug_handler]
pub async fn upload_post_cover(
    Extension(config): Extension<Config>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ResponseJson<ApiResponse<UploadResponse>>), (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        service_error_to_http(ServiceError::validation(format!(
            "Malformed multipart body: {}",
            e
        )))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned).unwrap_or_default();
        let Some((_, extension)) = ALLOWED_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
        else {
            return Err(service_error_to_http(ServiceError::validation(
                "Only PNG, JPEG, and WebP images are allowed",
            )));
        };

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|e| {
            service_error_to_http(ServiceError::validation(format!(
                "Failed to read upload: {}",
                e
            )))
        })?;

        if data.len() > MAX_UPLOAD_BYTES {
            return Err(service_error_to_http(ServiceError::validation(
                "File exceeds the 5 MiB upload limit",
            )));
        }

        let filename = format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::now_v7(),
            extension
        );
        let destination = Path::new(&config.upload_dir).join(&filename);

        tokio::fs::write(&destination, &data).await.map_err(|e| {
            service_error_to_http(ServiceError::internal_error(format!(
                "Failed to store upload: {}",
                e
            )))
        })?;

        tracing::info!(filename = %filename, bytes = data.len(), "stored post cover");

        let response = UploadResponse {
            url: format!("/uploads/{}", filename),
            filename,
            original_name,
        };

        return Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(response, "File uploaded successfully")),
        ));
    }

    Err(service_error_to_http(ServiceError::validation(
        "Missing 'file' field in multipart body",
    )))
}
