//! HTTP client for the Lumen documents backend.

use crate::error::{ClientError, Result};
use crate::types::ClientConfig;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for the documents endpoints of a Lumen backend.
///
/// Each method maps to exactly one request. Application failures reported
/// in the response body (`success: false`) surface as
/// [`ClientError::Rejected`]; nothing is retried.
///
/// # Example
///
/// ```ignore
/// use lumen_client::{ClientConfig, DocumentsClient};
///
/// let client = DocumentsClient::new(ClientConfig::new("http://localhost:3000"))?;
/// let documents = client.list_documents().await?;
/// println!("Found {} documents", documents.len());
/// ```
#[derive(Debug, Clone)]
pub struct DocumentsClient {
    pub(crate) http: Client,
    base_url: Url,
}

impl DocumentsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/');
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url = Url::parse(url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut builder = Client::builder().user_agent(format!(
            "Lumen/{} (Documents)",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!(url = %base_url, "Created documents client");

        Ok(Self { http, base_url })
    }

    /// Base URL of the backend, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Segments are percent-encoded, so an id containing `/` stays one segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Decode a JSON response body regardless of HTTP status.
///
/// The backend reports application failures inside the body, often with a
/// 4xx/5xx status. A body that is not JSON is a parse error on 2xx and a
/// server error otherwise.
pub(crate) async fn decode_body<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(e) if status.is_success() => Err(ClientError::ParseError(format!(
            "Failed to parse {} response: {}",
            what, e
        ))),
        Err(_) => Err(ClientError::ServerError {
            status: status.as_u16(),
            message: body,
        }),
    }
}
