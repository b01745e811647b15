//! Document upload operations.

use crate::client::{decode_body, DocumentsClient};
use crate::error::{ClientError, Result};
use crate::types::wire::ApiResponse;
use crate::types::UploadFile;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::{debug, info};

impl DocumentsClient {
    /// Upload a single file as a new document.
    ///
    /// The multipart body carries the raw bytes under `file` and the file
    /// name under `title`.
    pub async fn upload_document(&self, file: &UploadFile) -> Result<()> {
        let url = self.endpoint(&["api", "upload"])?;
        debug!(url = %url, file = %file.name, size = file.contents.len(), "Uploading document");

        let file_part = Part::bytes(file.contents.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type)?;

        let form = Form::new()
            .part("file", file_part)
            .text("title", file.name.clone());

        let response = self.http.post(url).multipart(form).send().await?;
        let envelope: ApiResponse = decode_body(response, "upload").await?;

        if envelope.success {
            info!(file = %file.name, size = file.contents.len(), "Document uploaded");
            Ok(())
        } else {
            Err(ClientError::Rejected {
                reason: envelope.reason(),
            })
        }
    }
}

impl UploadFile {
    /// Read a file from disk into an upload.
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClientError::FileNotFound(path.display().to_string()));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        let contents = tokio::fs::read(path).await?;
        Ok(Self::new(name, contents))
    }
}

/// Get MIME type for a document file name.
pub(crate) fn mime_type_for_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md" | "markdown") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("rtf") => "application/rtf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}
