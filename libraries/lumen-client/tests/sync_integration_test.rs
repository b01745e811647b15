//! Integration tests for the document list synchronizer.
//!
//! These drive the synchronizer against a mock backend over real HTTP and
//! check both the held list and the notifications a user would see.

use lumen_client::{
    ClientConfig, DocumentStatus, DocumentSynchronizer, DocumentsClient, Notification,
    NotificationLevel, Notifier, UploadFile,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

type TestSynchronizer = DocumentSynchronizer<DocumentsClient, Arc<RecordingNotifier>>;

fn synchronizer_for(server: &MockServer) -> (TestSynchronizer, Arc<RecordingNotifier>) {
    let client = DocumentsClient::new(ClientConfig::new(server.uri())).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    (
        DocumentSynchronizer::with_notifier(client, Arc::clone(&notifier)),
        notifier,
    )
}

fn listing(documents: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "documents": documents
    }))
}

fn list_request_count(requests: &[wiremock::Request]) -> usize {
    requests
        .iter()
        .filter(|r| r.url.path() == "/api/documents/list")
        .count()
}

// =============================================================================
// Refresh Tests
// =============================================================================

mod refresh {
    use super::*;

    /// A single record with only a filename and a date.
    #[tokio::test]
    async fn test_refresh_single_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([
                { "id": 1, "metadata": { "filename": "a.pdf" }, "created_at": "2024-01-01" }
            ])))
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        assert!(sync.refresh().await);

        let documents = sync.documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "1");
        assert_eq!(documents[0].name, "a.pdf");
        assert_eq!(documents[0].doc_type, "unknown");
        assert_eq!(documents[0].size, 0);
        assert_eq!(documents[0].status, DocumentStatus::Embedded);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_preserves_backend_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([
                { "id": 30, "metadata": { "filename": "c.pdf" } },
                { "id": 10, "metadata": { "filename": "a.pdf" } },
                { "id": 20, "metadata": { "filename": "b.pdf" } }
            ])))
            .mount(&mock_server)
            .await;

        let (sync, _) = synchronizer_for(&mock_server);
        sync.refresh().await;

        let ids: Vec<_> = sync.documents().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
    }

    #[tokio::test]
    async fn test_refresh_failure_notifies_and_resets_loading() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        assert!(!sync.refresh().await);

        assert!(sync.is_empty());
        assert!(!sync.is_loading());
        assert_eq!(
            notifier.messages(),
            vec![Notification::error("Failed to load documents")]
        );
    }

    #[tokio::test]
    async fn test_loading_true_while_request_pending() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([])).set_delay(Duration::from_millis(300)))
            .mount(&mock_server)
            .await;

        let (sync, _) = synchronizer_for(&mock_server);
        assert!(!sync.is_loading());

        let probe = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            sync.is_loading()
        };
        let (refreshed, loading_during) = tokio::join!(sync.refresh(), probe);

        assert!(refreshed);
        assert!(loading_during);
        assert!(!sync.is_loading());
    }
}

// =============================================================================
// Upload Flow Tests
// =============================================================================

mod upload_flow {
    use super::*;

    #[tokio::test]
    async fn test_rejected_upload_still_refreshes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "too large"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        let report = sync
            .upload(&[UploadFile::new("x.txt", b"hello".to_vec())])
            .await;

        assert_eq!(report.failed(), 1);
        assert!(report.refreshed);

        let failure = notifier
            .messages()
            .into_iter()
            .find(|n| n.level == NotificationLevel::Error)
            .expect("failure notification");
        assert!(failure.message.contains("x.txt"));
        assert!(failure.message.contains("too large"));

        // The refresh came after the upload.
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url.path(), "/api/documents/list");
    }

    #[tokio::test]
    async fn test_mixed_outcomes_refresh_once_after_all_settle() {
        let mock_server = MockServer::start().await;

        // The slow success is the last upload to settle.
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .and(wiremock::matchers::body_string_contains("slow.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": true }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .and(wiremock::matchers::body_string_contains("bad.pdf"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "success": false,
                "message": "unreadable PDF"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .and(wiremock::matchers::body_string_contains("ok.md"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([
                { "id": 1, "metadata": { "filename": "slow.pdf" } },
                { "id": 2, "metadata": { "filename": "ok.md" } }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        let files = vec![
            UploadFile::new("slow.pdf", b"slow".to_vec()),
            UploadFile::new("bad.pdf", b"bad".to_vec()),
            UploadFile::new("ok.md", b"ok".to_vec()),
        ];
        let report = sync.upload(&files).await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.refreshed);
        assert_eq!(sync.len(), 2);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(list_request_count(&requests), 1);
        assert_eq!(
            requests.last().map(|r| r.url.path().to_string()),
            Some("/api/documents/list".to_string())
        );

        let messages: Vec<_> = notifier.messages().into_iter().map(|n| n.message).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages.contains(&"slow.pdf uploaded successfully".to_string()));
        assert!(messages.contains(&"ok.md uploaded successfully".to_string()));
        assert!(messages.contains(&"Failed to upload bad.pdf: unreadable PDF".to_string()));
    }

    #[tokio::test]
    async fn test_upload_against_unreachable_backend() {
        let client = DocumentsClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = DocumentSynchronizer::with_notifier(client, Arc::clone(&notifier));

        let report = sync
            .upload(&[UploadFile::new("notes.txt", b"n".to_vec())])
            .await;

        assert_eq!(report.failed(), 1);
        assert!(!report.refreshed);
        assert_eq!(
            notifier.messages(),
            vec![
                Notification::error("Failed to upload notes.txt"),
                Notification::error("Failed to load documents"),
            ]
        );
    }
}

// =============================================================================
// Delete Flow Tests
// =============================================================================

mod delete_flow {
    use super::*;

    async fn mount_three_documents(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/documents/list"))
            .respond_with(listing(serde_json::json!([
                { "id": 1, "metadata": { "filename": "a.pdf" } },
                { "id": 2, "metadata": { "title": "Roadmap" } },
                { "id": 3 }
            ])))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_delete_removes_locally_without_refetch() {
        let mock_server = MockServer::start().await;
        mount_three_documents(&mock_server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/documents/2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        sync.refresh().await;

        assert!(sync.remove("2").await);

        let ids: Vec<_> = sync.documents().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(
            notifier.messages(),
            vec![Notification::success("Deleted: Roadmap")]
        );
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_list_untouched() {
        let mock_server = MockServer::start().await;
        mount_three_documents(&mock_server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/documents/3"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "error": "storage unavailable"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sync, notifier) = synchronizer_for(&mock_server);
        sync.refresh().await;
        let before = sync.documents();

        assert!(!sync.remove("3").await);

        assert_eq!(sync.documents(), before);
        assert_eq!(
            notifier.messages(),
            vec![Notification::error("Failed to delete: Document 3")]
        );
    }
}
