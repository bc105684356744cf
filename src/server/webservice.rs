//! Reference SMSSync web service.
//!
//! Implements the server side of the result sync protocol on `/`:
//!
//! - `GET ?task=result`: UUIDs the service is waiting on, as `{"uuids": [...]}`
//! - `POST ?task=result`: `{"message_result": [...]}`; records the results and
//!   stops waiting on their UUIDs
//! - `POST ?task=sent`: `{"queued_messages": [...]}`; starts waiting on those
//!   UUIDs and echoes them back as `{"uuids": [...]}`
//!
//! When a secret is configured every request must carry it as `secret`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::trace::TraceLayer;

use crate::models::{MessageResult, MessageResultBatch, QueuedMessageBatch, UuidListResponse};

#[derive(Debug, Default)]
struct Inbox {
    /// UUIDs with results still outstanding, in arrival order
    awaiting: Vec<String>,
    /// Every result received so far
    results: Vec<MessageResult>,
}

/// Shared state of the web service.
#[derive(Debug, Clone, Default)]
pub struct WebService {
    secret: Option<String>,
    inbox: Arc<Mutex<Inbox>>,
}

impl WebService {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            inbox: Arc::default(),
        }
    }

    /// Starts waiting for results of `uuids`. Already awaited UUIDs are kept once.
    pub fn await_uuids<I>(&self, uuids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut inbox = self.inbox();
        for uuid in uuids {
            if !inbox.awaiting.contains(&uuid) {
                inbox.awaiting.push(uuid);
            }
        }
    }

    pub fn awaiting(&self) -> Vec<String> {
        self.inbox().awaiting.clone()
    }

    pub fn results(&self) -> Vec<MessageResult> {
        self.inbox().results.clone()
    }

    fn record_results(&self, results: Vec<MessageResult>) {
        let mut inbox = self.inbox();
        inbox
            .awaiting
            .retain(|uuid| !results.iter().any(|r| &r.uuid == uuid));
        inbox.results.extend(results);
    }

    fn inbox(&self) -> MutexGuard<'_, Inbox> {
        // Every update completes under one lock, so a poisoned inbox is still consistent
        self.inbox.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn authorize(&self, params: &TaskParams) -> Result<(), Response> {
        match &self.secret {
            Some(secret) if params.secret.as_deref() != Some(secret.as_str()) => {
                tracing::warn!("Rejected request with missing or wrong secret");
                Err(error_response(StatusCode::FORBIDDEN, "invalid secret"))
            }
            _ => Ok(()),
        }
    }

    /// Builds the router serving the protocol.
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(get_task).post(post_task))
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }
}

#[derive(Debug, Deserialize)]
struct TaskParams {
    task: Option<String>,
    secret: Option<String>,
}

async fn get_task(State(service): State<WebService>, Query(params): Query<TaskParams>) -> Response {
    if let Err(rejection) = service.authorize(&params) {
        return rejection;
    }

    match params.task.as_deref() {
        Some("result") => Json(UuidListResponse::with_uuids(service.awaiting())).into_response(),
        other => unknown_task(other),
    }
}

async fn post_task(
    State(service): State<WebService>,
    Query(params): Query<TaskParams>,
    body: String,
) -> Response {
    if let Err(rejection) = service.authorize(&params) {
        return rejection;
    }

    match params.task.as_deref() {
        Some("result") => match serde_json::from_str::<MessageResultBatch>(&body) {
            Ok(batch) => {
                tracing::info!("Received {} message result(s)", batch.message_result.len());
                service.record_results(batch.message_result);
                Json(serde_json::json!({ "success": true })).into_response()
            }
            Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        Some("sent") => match serde_json::from_str::<QueuedMessageBatch>(&body) {
            Ok(batch) => {
                tracing::info!("Received {} queued message(s)", batch.len());
                service.await_uuids(batch.queued_messages.iter().cloned());
                Json(UuidListResponse::with_uuids(batch.queued_messages)).into_response()
            }
            Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        other => unknown_task(other),
    }
}

fn unknown_task(task: Option<&str>) -> Response {
    let message = match task {
        Some(task) => format!("unknown task '{}'", task),
        None => "missing task".to_string(),
    };
    error_response(StatusCode::BAD_REQUEST, &message)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}
