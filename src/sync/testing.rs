//! In-memory collaborators for client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::error::{StoreError, TransportError};
use super::log_sink::LogSink;
use super::store::MessageStore;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::models::{Message, MessageStatus};

/// Transport that replays queued responses and records every request.
///
/// When the queue runs dry, requests fail with a connection error.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no response queued".into())))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: HashMap<String, Message>,
    broken: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.insert(message.uuid.clone(), message);
        self
    }

    /// Makes lookups of `uuid` fail.
    pub fn with_broken(mut self, uuid: &str) -> Self {
        self.broken.push(uuid.to_string());
        self
    }
}

impl MessageStore for MemoryStore {
    async fn fetch_pending_by_uuid(&self, uuid: &str) -> Result<Option<Message>, StoreError> {
        if self.broken.iter().any(|b| b == uuid) {
            return Err(StoreError::InvalidRow(format!("corrupt row {}", uuid)));
        }
        Ok(self
            .messages
            .get(uuid)
            .filter(|m| m.status == MessageStatus::Pending)
            .cloned())
    }
}

#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
