use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Waiting for the web service to acknowledge its result
    Pending,
    Sent,
    Failed,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Pending => write!(f, "pending"),
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MessageStatus::Pending),
            "sent" => Ok(MessageStatus::Sent),
            "failed" => Ok(MessageStatus::Failed),
            _ => Err(format!(
                "Invalid message status '{}'. Valid options: pending, sent, failed",
                s
            )),
        }
    }
}

/// A message as held by the local message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub uuid: String,
    /// Phone number the message came from or went to
    pub address: String,
    pub body: String,
    /// When the message was sent
    pub message_date: DateTime<Utc>,
    pub sent_result_message: Option<String>,
    pub delivery_result_code: Option<i32>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub status: MessageStatus,
}

impl Message {
    pub fn new(uuid: impl Into<String>, address: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            address: address.into(),
            body: body.into(),
            message_date: Utc::now(),
            sent_result_message: None,
            delivery_result_code: None,
            delivered_date: None,
            status: MessageStatus::Pending,
        }
    }

    pub fn with_message_date(mut self, date: DateTime<Utc>) -> Self {
        self.message_date = date;
        self
    }

    pub fn with_sent_result(mut self, message: impl Into<String>) -> Self {
        self.sent_result_message = Some(message.into());
        self
    }

    pub fn with_delivery(mut self, code: i32, delivered_date: DateTime<Utc>) -> Self {
        self.delivery_result_code = Some(code);
        self.delivered_date = Some(delivered_date);
        self
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }
}
