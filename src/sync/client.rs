//! Result sync client.
//!
//! Talks to SMSSync web services over three calls:
//!
//! - `GET  ?task=result`: which message UUIDs does the service want results for
//! - `POST ?task=result`: here are the results for those messages
//! - `POST ?task=sent`: these messages were sent and are awaiting results
//!
//! Every failure (bad URL, network error, non-200 status, unparseable reply)
//! is written to the status log and turned into a response value. Nothing in
//! this module returns an error to the caller, so one broken endpoint never
//! stops a sync pass.

use std::collections::HashSet;

use super::error::SyncError;
use super::log_sink::LogSink;
use super::store::MessageStore;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use super::url::{endpoint_url, Task};
use crate::models::{
    MessageResult, MessageResultBatch, QueuedMessageBatch, SyncEndpoint, UuidListResponse,
};

/// Outcome of syncing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Endpoint as displayed to the user
    pub endpoint: String,
    /// Status code of the result fetch (-1 when it never got an answer)
    pub status_code: i32,
    /// Number of distinct UUIDs the endpoint asked about
    pub uuids_requested: usize,
    /// Number of message results posted back
    pub results_posted: usize,
}

impl SyncResult {
    pub fn fetch_succeeded(&self) -> bool {
        self.status_code == 200
    }
}

/// Syncs message results with web service endpoints.
pub struct ResultSyncClient<T, S, L> {
    transport: T,
    store: S,
    log: L,
}

impl<T, S, L> ResultSyncClient<T, S, L>
where
    T: HttpTransport,
    S: MessageStore,
    L: LogSink,
{
    pub fn new(transport: T, store: S, log: L) -> Self {
        Self {
            transport,
            store,
            log,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Runs one sync pass over every enabled endpoint, in order.
    ///
    /// Disabled endpoints are skipped without any request.
    pub async fn sync(&self, endpoints: &[SyncEndpoint]) -> Vec<SyncResult> {
        let mut results = Vec::new();

        for endpoint in endpoints.iter().filter(|e| e.is_enabled()) {
            results.push(self.sync_endpoint(endpoint).await);
        }

        results
    }

    /// Fetches the UUIDs `endpoint` wants results for and posts back the
    /// results of those found in the local store.
    pub async fn sync_endpoint(&self, endpoint: &SyncEndpoint) -> SyncResult {
        let response = self.fetch_results(endpoint).await;

        let mut result = SyncResult {
            endpoint: endpoint.to_string(),
            status_code: response.status_code,
            uuids_requested: response.uuids.iter().collect::<HashSet<_>>().len(),
            results_posted: 0,
        };

        if !response.success || !response.has_uuids() {
            return result;
        }

        let message_results = self.resolve(&response.uuids).await;
        if !message_results.is_empty() {
            self.post_results(endpoint, &message_results).await;
            result.results_posted = message_results.len();
        }

        result
    }

    /// `GET ?task=result`: asks `endpoint` which message UUIDs it wants
    /// results for.
    pub async fn fetch_results(&self, endpoint: &SyncEndpoint) -> UuidListResponse {
        let outcome = self.request(endpoint, Task::Result, None).await;
        self.uuid_response("Message results request", endpoint, outcome)
    }

    /// `POST ?task=result`: reports `results` to `endpoint`.
    pub async fn post_results(&self, endpoint: &SyncEndpoint, results: &[MessageResult]) {
        let batch = MessageResultBatch {
            message_result: results.to_vec(),
        };
        let outcome = match serde_json::to_string(&batch).map_err(SyncError::Encode) {
            Ok(body) => self.request(endpoint, Task::Result, Some(body)).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(_) => self.log.append(&format!(
                "Sent {} message result(s) to {}",
                results.len(),
                endpoint
            )),
            Err(e) => {
                self.report_failure("Sending message results", endpoint, &e);
            }
        }
    }

    /// `POST ?task=sent`: reports queued messages to `endpoint`.
    ///
    /// Returns `None` without sending anything when `batch` is empty.
    pub async fn post_queued_messages(
        &self,
        endpoint: &SyncEndpoint,
        batch: &QueuedMessageBatch,
    ) -> Option<UuidListResponse> {
        if batch.is_empty() {
            return None;
        }

        let outcome = match serde_json::to_string(batch).map_err(SyncError::Encode) {
            Ok(body) => self.request(endpoint, Task::Sent, Some(body)).await,
            Err(e) => Err(e),
        };

        let response = self.uuid_response("Queued messages request", endpoint, outcome);
        if response.success {
            self.log.append(&format!(
                "Reported {} queued message(s) to {}",
                batch.len(),
                endpoint
            ));
        }
        Some(response)
    }

    /// Looks up each UUID once, keeping only messages the store knows.
    async fn resolve(&self, uuids: &[String]) -> Vec<MessageResult> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for uuid in uuids {
            if !seen.insert(uuid.as_str()) {
                continue;
            }
            match self.store.fetch_pending_by_uuid(uuid).await {
                Ok(Some(message)) => results.push(MessageResult::from(&message)),
                Ok(None) => tracing::debug!("No pending message with uuid {}", uuid),
                Err(e) => {
                    tracing::warn!("Failed to look up message {}: {}", uuid, e);
                    self.log
                        .append(&format!("Failed to look up message {}: {}", uuid, e));
                }
            }
        }

        results
    }

    /// Sends one request. GET when there is no body, JSON POST otherwise.
    /// Anything but a 200 is an error.
    async fn request(
        &self,
        endpoint: &SyncEndpoint,
        task: Task,
        body: Option<String>,
    ) -> Result<HttpResponse, SyncError> {
        let url = endpoint_url(endpoint, task)?;
        let request = match body {
            Some(body) => HttpRequest::post_json(url, body),
            None => HttpRequest::get(url),
        };
        tracing::debug!("{} {} (task={})", request.method, endpoint.url, task);

        let response = self.transport.execute(request).await?;
        tracing::debug!("{} answered {}", endpoint.url, response.status);

        if response.status != 200 {
            return Err(SyncError::Status(response.status));
        }
        Ok(response)
    }

    /// Turns the outcome of a UUID-returning request into a response value,
    /// logging any failure.
    fn uuid_response(
        &self,
        context: &str,
        endpoint: &SyncEndpoint,
        outcome: Result<HttpResponse, SyncError>,
    ) -> UuidListResponse {
        match outcome.and_then(|response| parse_uuid_response(&response)) {
            Ok(response) => response,
            Err(e) => UuidListResponse::failed(self.report_failure(context, endpoint, &e)),
        }
    }

    fn report_failure(&self, context: &str, endpoint: &SyncEndpoint, error: &SyncError) -> i32 {
        tracing::warn!("{} to {} failed: {}", context, endpoint.url, error);
        self.log
            .append(&format!("{} to {} failed: {}", context, endpoint, error));
        error.status_code()
    }
}

fn parse_uuid_response(response: &HttpResponse) -> Result<UuidListResponse, SyncError> {
    let mut parsed: UuidListResponse =
        serde_json::from_str(&response.body).map_err(SyncError::Parse)?;
    parsed.status_code = i32::from(response.status);
    parsed.success = true;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EndpointStatus, Message, MessageStatus, FAILED_STATUS_CODE};
    use crate::sync::error::TransportError;
    use crate::sync::testing::{MemoryLogSink, MemoryStore, MockTransport};
    use crate::sync::transport::HttpMethod;
    use chrono::{TimeZone, Utc};

    type TestClient = ResultSyncClient<MockTransport, MemoryStore, MemoryLogSink>;

    fn client_with(store: MemoryStore) -> TestClient {
        ResultSyncClient::new(MockTransport::new(), store, MemoryLogSink::new())
    }

    fn endpoint() -> SyncEndpoint {
        SyncEndpoint::new("http://example.com/smssync").with_secret("s3cret")
    }

    fn delivered_message(uuid: &str) -> Message {
        Message::new(uuid, "+15550100", "hello")
            .with_message_date(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
            .with_sent_result("SMS sent")
            .with_delivery(0, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 3).unwrap())
    }

    fn posted_results(request: &HttpRequest) -> Vec<MessageResult> {
        let batch: MessageResultBatch =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        batch.message_result
    }

    #[tokio::test]
    async fn test_fetch_results_success() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, r#"{"uuids": ["a", "b"]}"#);

        let response = client.fetch_results(&endpoint()).await;

        assert!(response.success);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.uuids, vec!["a", "b"]);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(
            requests[0].url.as_str(),
            "http://example.com/smssync?task=result&secret=s3cret"
        );
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_fetch_results_non_200_keeps_status() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(404, "not found");

        let response = client.fetch_results(&endpoint()).await;

        assert!(!response.success);
        assert_eq!(response.status_code, 404);
        assert!(!response.has_uuids());
        let lines = client.log().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("status 404"));
    }

    #[tokio::test]
    async fn test_fetch_results_transport_failure() {
        let client = client_with(MemoryStore::new());
        client
            .transport()
            .fail(TransportError::Connection("connection refused".into()));

        let response = client.fetch_results(&endpoint()).await;

        assert!(!response.success);
        assert_eq!(response.status_code, FAILED_STATUS_CODE);
        let lines = client.log().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_fetch_results_bad_json() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, "<html>oops</html>");

        let response = client.fetch_results(&endpoint()).await;

        assert!(!response.success);
        assert_eq!(response.status_code, FAILED_STATUS_CODE);
        assert!(client.log().lines()[0].contains("failed to parse server response"));
    }

    #[tokio::test]
    async fn test_fetch_results_empty_body() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, "");

        let response = client.fetch_results(&endpoint()).await;

        assert!(!response.success);
        assert_eq!(response.status_code, FAILED_STATUS_CODE);
    }

    #[tokio::test]
    async fn test_fetch_results_invalid_url_sends_nothing() {
        let client = client_with(MemoryStore::new());

        let response = client
            .fetch_results(&SyncEndpoint::new("example.com/no-scheme"))
            .await;

        assert_eq!(response.status_code, FAILED_STATUS_CODE);
        assert!(client.transport().requests().is_empty());
        assert!(client.log().lines()[0].contains("invalid endpoint URL"));
    }

    #[tokio::test]
    async fn test_sync_posts_only_resolved_uuids() {
        let store = MemoryStore::new().with_message(delivered_message("A"));
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": ["A", "B"]}"#);
        client.transport().respond(200, r#"{"success": true}"#);

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uuids_requested, 2);
        assert_eq!(results[0].results_posted, 1);
        assert!(results[0].fetch_succeeded());

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url, requests[0].url);

        let posted = posted_results(&requests[1]);
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0], MessageResult::from(&delivered_message("A")));
    }

    #[tokio::test]
    async fn test_sync_without_uuids_posts_nothing() {
        let store = MemoryStore::new().with_message(delivered_message("A"));
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": []}"#);

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results[0].results_posted, 0);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_with_no_local_matches_posts_nothing() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, r#"{"uuids": ["X", "Y"]}"#);

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results[0].uuids_requested, 2);
        assert_eq!(results[0].results_posted, 0);
        assert_eq!(client.transport().requests().len(), 1);
        assert!(client.log().lines().is_empty());
    }

    #[tokio::test]
    async fn test_sync_skips_messages_that_are_no_longer_pending() {
        let store = MemoryStore::new()
            .with_message(delivered_message("A").with_status(MessageStatus::Sent));
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": ["A"]}"#);

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results[0].results_posted, 0);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_resolves_duplicate_uuid_once() {
        let store = MemoryStore::new().with_message(delivered_message("A"));
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": ["A", "A"]}"#);
        client.transport().respond(200, "{}");

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results[0].uuids_requested, 1);
        assert_eq!(results[0].results_posted, 1);
        let requests = client.transport().requests();
        assert_eq!(posted_results(&requests[1]).len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_results_null_uuids_is_empty_success() {
        let store = MemoryStore::new().with_message(delivered_message("A"));
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": null}"#);

        let response = client.fetch_results(&endpoint()).await;

        assert!(response.success);
        assert_eq!(response.status_code, 200);
        assert!(!response.has_uuids());
        assert!(client.log().lines().is_empty());

        client.transport().respond(200, r#"{"uuids": null}"#);
        let results = client.sync(&[endpoint()]).await;

        assert!(results[0].fetch_succeeded());
        assert_eq!(results[0].uuids_requested, 0);
        assert_eq!(results[0].results_posted, 0);
        assert_eq!(client.transport().requests().len(), 2);
        assert!(client.log().lines().is_empty());
    }

    #[tokio::test]
    async fn test_sync_store_error_is_logged_and_skipped() {
        let store = MemoryStore::new()
            .with_message(delivered_message("A"))
            .with_broken("B");
        let client = client_with(store);
        client.transport().respond(200, r#"{"uuids": ["B", "A"]}"#);
        client.transport().respond(200, "{}");

        let results = client.sync(&[endpoint()]).await;

        assert_eq!(results[0].results_posted, 1);
        let lines = client.log().lines();
        assert!(lines[0].contains("Failed to look up message B"));
    }

    #[tokio::test]
    async fn test_sync_skips_disabled_endpoints() {
        let client = client_with(MemoryStore::new());
        let disabled = endpoint().with_status(EndpointStatus::Disabled);

        let results = client.sync(&[disabled]).await;

        assert!(results.is_empty());
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_sync_continues_after_failing_endpoint() {
        let store = MemoryStore::new().with_message(delivered_message("A"));
        let client = client_with(store);
        let first = SyncEndpoint::new("http://down.example.com");
        let second = SyncEndpoint::new("http://up.example.com");

        client
            .transport()
            .fail(TransportError::Connection("unreachable".into()));
        client.transport().respond(200, r#"{"uuids": ["A"]}"#);
        client.transport().respond(200, "{}");

        let results = client.sync(&[first, second]).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status_code, FAILED_STATUS_CODE);
        assert_eq!(results[0].results_posted, 0);
        assert_eq!(results[1].status_code, 200);
        assert_eq!(results[1].results_posted, 1);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].url.host_str(), Some("up.example.com"));
    }

    #[tokio::test]
    async fn test_post_results_failure_is_logged() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(500, "boom");

        client
            .post_results(&endpoint(), &[MessageResult::from(&delivered_message("A"))])
            .await;

        let lines = client.log().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Sending message results"));
        assert!(lines[0].contains("status 500"));
    }

    #[tokio::test]
    async fn test_post_results_success_is_logged() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, "{}");

        client
            .post_results(&endpoint(), &[MessageResult::from(&delivered_message("A"))])
            .await;

        let lines = client.log().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Sent 1 message result(s)"));
    }

    #[tokio::test]
    async fn test_post_queued_messages_empty_batch_sends_nothing() {
        let client = client_with(MemoryStore::new());

        let response = client
            .post_queued_messages(&endpoint(), &QueuedMessageBatch::default())
            .await;

        assert!(response.is_none());
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_post_queued_messages_success() {
        let client = client_with(MemoryStore::new());
        client.transport().respond(200, r#"{"uuids": ["q1"]}"#);
        let batch = QueuedMessageBatch::new(vec!["q1".into(), "q2".into()]);

        let response = client
            .post_queued_messages(&endpoint(), &batch)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.uuids, vec!["q1"]);

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].url.as_str(),
            "http://example.com/smssync?task=sent&secret=s3cret"
        );
        let sent: QueuedMessageBatch =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, batch);
    }

    #[tokio::test]
    async fn test_post_queued_messages_failure_codes() {
        let client = client_with(MemoryStore::new());
        let batch = QueuedMessageBatch::new(vec!["q1".into()]);

        client.transport().respond(403, "forbidden");
        let response = client
            .post_queued_messages(&endpoint(), &batch)
            .await
            .unwrap();
        assert_eq!(response, UuidListResponse::failed(403));

        client
            .transport()
            .fail(TransportError::Timeout("30s".into()));
        let response = client
            .post_queued_messages(&endpoint(), &batch)
            .await
            .unwrap();
        assert_eq!(response, UuidListResponse::failed(FAILED_STATUS_CODE));

        assert_eq!(client.log().lines().len(), 2);
    }
}
