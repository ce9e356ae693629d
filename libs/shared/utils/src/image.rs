//! Image uploads stored inline as base64 next to the owning row.

use axum::{
    extract::Multipart,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use shared_models::error::AppError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Request body ceiling for upload routes: the image plus multipart framing.
pub const IMAGE_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Result<Self, AppError> {
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("File must be an image".to_string()));
        }
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest("File size must be less than 5MB".to_string()));
        }

        Ok(Self {
            content_type: content_type.to_string(),
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Pulls the `file` field out of a multipart form.
pub async fn read_image_upload(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        debug!("Received {} byte upload ({})", bytes.len(), content_type);
        return ImageUpload::new(&content_type, bytes.to_vec());
    }

    Err(AppError::BadRequest("Missing file field".to_string()))
}

/// Decodes a stored image back into a binary response.
pub fn image_response(encoded: &str, content_type: &str) -> Result<Response, AppError> {
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Internal(format!("Stored image is corrupt: {}", e)))?;

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        bytes,
    )
        .into_response())
}
