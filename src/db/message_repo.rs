use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::models::{Message, MessageStatus};
use crate::sync::{MessageStore, StoreError};

/// Read-only view of the phone's message database.
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    uuid: String,
    address: String,
    body: String,
    message_date: String,
    sent_result_message: Option<String>,
    delivery_result_code: Option<i32>,
    delivered_date: Option<String>,
    status: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let delivered_date = match row.delivered_date.as_deref() {
            Some(date) => Some(parse_date(&row.uuid, date)?),
            None => None,
        };

        Ok(Message {
            message_date: parse_date(&row.uuid, &row.message_date)?,
            status: MessageStatus::from_str(&row.status).map_err(StoreError::InvalidRow)?,
            uuid: row.uuid,
            address: row.address,
            body: row.body,
            sent_result_message: row.sent_result_message,
            delivery_result_code: row.delivery_result_code,
            delivered_date,
        })
    }
}

fn parse_date(uuid: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidRow(format!("message {}: bad date '{}': {}", uuid, value, e)))
}

impl SqliteMessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// UUIDs of all pending messages, oldest first.
    pub async fn pending_uuids(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT uuid FROM messages WHERE status = ? ORDER BY message_date, uuid")
                .bind(MessageStatus::Pending.to_string())
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(uuid,)| uuid).collect())
    }

    #[cfg(test)]
    pub(crate) async fn insert(&self, message: &Message) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO messages (uuid, address, body, message_date, sent_result_message, delivery_result_code, delivered_date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.uuid)
        .bind(&message.address)
        .bind(&message.body)
        .bind(message.message_date.to_rfc3339())
        .bind(&message.sent_result_message)
        .bind(message.delivery_result_code)
        .bind(message.delivered_date.map(|d| d.to_rfc3339()))
        .bind(message.status.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl MessageStore for SqliteMessageStore {
    async fn fetch_pending_by_uuid(&self, uuid: &str) -> Result<Option<Message>, StoreError> {
        let row: Option<MessageRow> =
            sqlx::query_as("SELECT * FROM messages WHERE uuid = ? AND status = ?")
                .bind(uuid)
                .bind(MessageStatus::Pending.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Message::try_from).transpose()
    }
}
