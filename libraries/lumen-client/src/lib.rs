//! Lumen Documents Client
//!
//! HTTP client and list synchronizer for the Lumen document store, the
//! backend that holds uploaded documents and feeds the RAG search index.
//!
//! # Features
//!
//! - **Listing**: Fetch all documents and decode them into [`DocumentSummary`]
//! - **Upload**: Upload many files concurrently, reporting each outcome
//! - **Delete**: Remove a document and drop it from the local list
//! - **Notifications**: Every outcome is reported through a [`Notifier`]
//!
//! # Example
//!
//! ```ignore
//! use lumen_client::{ClientConfig, DocumentSynchronizer, DocumentsClient, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DocumentsClient::new(ClientConfig::new("http://localhost:3000"))?;
//!     let documents = DocumentSynchronizer::new(client);
//!
//!     documents.refresh().await;
//!     println!("Found {} documents", documents.len());
//!
//!     let file = UploadFile::from_path("notes.pdf".as_ref()).await?;
//!     let report = documents.upload(&[file]).await;
//!     println!("{} of {} uploads succeeded", report.succeeded(), report.outcomes.len());
//!
//!     Ok(())
//! }
//! ```

mod backend;
mod client;
mod documents;
mod error;
mod notify;
mod sync;
mod types;
mod upload;

// Re-export main types
pub use backend::DocumentBackend;
pub use client::DocumentsClient;
pub use error::{ClientError, Result};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use sync::{DocumentSynchronizer, UploadOutcome, UploadReport};
pub use types::{ClientConfig, DocumentStatus, DocumentSummary, UploadFile, DEFAULT_API_URL};
