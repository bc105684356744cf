mod endpoint;
mod message;
mod message_result;
mod uuid_response;

pub use endpoint::{EndpointStatus, SyncEndpoint};
pub use message::{Message, MessageStatus};
pub use message_result::{MessageResult, MessageResultBatch, QueuedMessageBatch};
pub use uuid_response::{UuidListResponse, FAILED_STATUS_CODE};
