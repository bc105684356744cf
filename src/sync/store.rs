use crate::models::Message;

use super::error::StoreError;

/// Read access to the local message store.
#[allow(async_fn_in_trait)]
pub trait MessageStore {
    /// Looks up a message that is still waiting for its result to be
    /// acknowledged. Returns `None` when no such message exists.
    async fn fetch_pending_by_uuid(&self, uuid: &str) -> Result<Option<Message>, StoreError>;
}
