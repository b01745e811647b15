//! Backend seam used by the synchronizer.

use crate::client::DocumentsClient;
use crate::error::Result;
use crate::types::{DocumentSummary, UploadFile};
use async_trait::async_trait;

/// Remote document store.
///
/// [`DocumentsClient`] is the HTTP implementation; tests substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Fetch the full listing.
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>>;

    /// Upload one file.
    async fn upload_document(&self, file: &UploadFile) -> Result<()>;

    /// Delete one document.
    async fn delete_document(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl DocumentBackend for DocumentsClient {
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        DocumentsClient::list_documents(self).await
    }

    async fn upload_document(&self, file: &UploadFile) -> Result<()> {
        DocumentsClient::upload_document(self, file).await
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        DocumentsClient::delete_document(self, id).await
    }
}
