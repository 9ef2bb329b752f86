// src/services/uploads.rs
use crate::core::endpoints::primary;
use crate::core::{ApiError, TransportClient};
use crate::types::ai::UploadedResume;
use crate::app_log;
use crate::utils::resume_content_type;
use reqwest::multipart::{Form, Part};
use std::path::Path;

const FILE_PART: &str = "file";

#[derive(Clone)]
pub struct UploadsService {
    client: TransportClient,
}

impl UploadsService {
    pub fn new(client: TransportClient) -> Self {
        Self { client }
    }

    /// Upload a resume file from disk. Only PDF and DOCX are accepted.
    pub async fn upload_resume(&self, file_path: &Path) -> Result<UploadedResume, ApiError> {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ApiError::unknown(format!("Invalid file path: {}", file_path.display()))
                    .with_code("INVALID_FILE")
            })?
            .to_string();

        // Reject unsupported formats before touching the file.
        resume_content_type(&file_name).map_err(unsupported)?;

        let content = tokio::fs::read(file_path).await.map_err(|e| {
            ApiError::unknown(format!("Failed to read file {}: {}", file_path.display(), e))
                .with_code("FILE_READ")
        })?;
        self.upload_resume_bytes(content, &file_name).await
    }

    pub async fn upload_resume_bytes(
        &self,
        content: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadedResume, ApiError> {
        let content_type = resume_content_type(file_name).map_err(unsupported)?;
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                ApiError::unknown(format!("Failed to create multipart: {}", e))
                    .with_code("INVALID_REQUEST")
            })?;

        app_log!(info, "Uploading resume {} ({})", file_name, content_type);
        self.client
            .post_multipart(primary::UPLOADS_RESUME.path(), Form::new().part(FILE_PART, part))
            .await
    }
}

fn unsupported(e: anyhow::Error) -> ApiError {
    ApiError::unknown(e.to_string()).with_code("UNSUPPORTED_FILE")
}
