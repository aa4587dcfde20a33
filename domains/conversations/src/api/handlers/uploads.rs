//! Upload API handler
//!
//! - POST /upload - Store a multipart `file` field and return its URL

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use threadline_common::{Error, Result};
use threadline_media::{MediaError, MediaUpload};

use crate::api::middleware::ConversationsState;

const FILE_FIELD: &str = "file";

/// Response for a stored upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

fn media_error(e: MediaError) -> Error {
    match e {
        MediaError::Validation(msg) => Error::Validation(msg),
        other => Error::Upload(other.to_string()),
    }
}

/// Store an uploaded file
pub async fn upload(
    State(state): State<ConversationsState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;

        let mut upload = MediaUpload::new(filename, bytes.to_vec());
        if let Some(content_type) = content_type {
            upload = upload.with_content_type(content_type);
        }

        let stored = state.media.upload(upload).await.map_err(media_error)?;
        tracing::info!(
            filename = %stored.filename,
            size_bytes = stored.size_bytes,
            "Stored upload"
        );

        return Ok(Json(UploadResponse { url: stored.url }));
    }

    Err(Error::Validation("No file uploaded".to_string()))
}
