//! Multipart upload handling for the bulk endpoints.

use actix_multipart::Multipart;
use futures::StreamExt;

use eligibility_core::domain::UploadedFile;

use crate::middleware::error::{AppError, AppResult};

/// Form field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Read the `file` field of a multipart body. Other fields are skipped.
/// Returns `None` when no file was sent.
pub async fn read_file_field(mut payload: Multipart) -> AppResult<Option<UploadedFile>> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            tracing::warn!(error = %e, "Failed to process multipart field");
            AppError::BadRequest("Failed to process upload".to_string())
        })?;

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                tracing::warn!(error = %e, "Failed to read upload chunk");
                AppError::BadRequest("Failed to read file data".to_string())
            })?;

            if bytes.len() + data.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest(
                    "File too large. Maximum size is 10MB.".to_string(),
                ));
            }
            bytes.extend_from_slice(&data);
        }

        tracing::debug!(file_name = %file_name, content_type = %content_type, size = bytes.len(), "Upload received");
        return Ok(Some(UploadedFile::new(file_name, content_type, bytes)));
    }

    Ok(None)
}
