//! Listing and deleting documents.

use crate::client::{decode_body, DocumentsClient};
use crate::error::{ClientError, Result};
use crate::types::wire::{ApiResponse, ListResponse};
use crate::types::DocumentSummary;
use tracing::{debug, warn};

impl DocumentsClient {
    /// Fetch every document the backend holds, in backend order.
    ///
    /// The whole listing fails if any record carries an unusable id.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let url = self.endpoint(&["api", "documents", "list"])?;
        debug!(url = %url, "Fetching document list");

        let response = self.http.get(url).send().await?;
        let listing: ListResponse = decode_body(response, "document list").await?;

        if !listing.success {
            let reason = ApiResponse {
                success: false,
                error: listing.error,
                message: listing.message,
            }
            .reason();
            warn!(reason = ?reason, "Document list rejected");
            return Err(ClientError::Rejected { reason });
        }

        let raw = listing.documents.ok_or_else(|| {
            ClientError::ParseError("Document list response has no documents".into())
        })?;

        let documents = raw
            .into_iter()
            .map(DocumentSummary::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(documents = documents.len(), "Fetched document list");
        Ok(documents)
    }

    /// Delete a document by id.
    pub async fn delete_document(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "documents", id])?;
        debug!(url = %url, document_id = %id, "Deleting document");

        let response = self.http.delete(url).send().await?;
        let envelope: ApiResponse = decode_body(response, "delete").await?;

        if envelope.success {
            debug!(document_id = %id, "Document deleted");
            Ok(())
        } else {
            Err(ClientError::Rejected {
                reason: envelope.reason(),
            })
        }
    }
}
