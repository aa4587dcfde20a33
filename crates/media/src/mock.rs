//! Mock Media Storage Implementation
//!
//! Keeps uploads in memory and returns `mock://` URLs.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::{MediaError, MediaStorage, MediaUpload, UploadedMedia};

/// Mock media storage for testing
#[derive(Debug, Clone, Default)]
pub struct MockMediaStorage {
    uploads: Arc<Mutex<Vec<UploadedMedia>>>,
}

impl MockMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all uploads stored so far
    pub fn uploads(&self) -> Vec<UploadedMedia> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaStorage for MockMediaStorage {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        upload.validate()?;

        let stored = UploadedMedia {
            url: format!("mock://uploads/{}/{}", Uuid::new_v4(), upload.filename),
            size_bytes: upload.bytes.len() as u64,
            filename: upload.filename,
        };

        tracing::info!(url = %stored.url, "Mock media storage captured upload");
        self.uploads.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}
