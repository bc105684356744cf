use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Send and delivery outcome of one message, as reported to a web service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResult {
    #[serde(rename = "message_uuid")]
    pub uuid: String,
    pub sent_result_message: Option<String>,
    pub delivery_result_code: Option<i32>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub sent_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub delivered_timestamp: Option<DateTime<Utc>>,
}

impl From<&Message> for MessageResult {
    fn from(message: &Message) -> Self {
        Self {
            uuid: message.uuid.clone(),
            sent_result_message: message.sent_result_message.clone(),
            delivery_result_code: message.delivery_result_code,
            sent_timestamp: Some(message.message_date),
            delivered_timestamp: message.delivered_date,
        }
    }
}

/// Request body for `POST ?task=result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResultBatch {
    pub message_result: Vec<MessageResult>,
}

/// Request body for `POST ?task=sent`: UUIDs of messages sent but not yet
/// acknowledged, in send order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedMessageBatch {
    pub queued_messages: Vec<String>,
}

impl QueuedMessageBatch {
    pub fn new(uuids: Vec<String>) -> Self {
        Self {
            queued_messages: uuids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queued_messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queued_messages.len()
    }
}
