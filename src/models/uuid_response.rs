use serde::{Deserialize, Deserializer, Serialize};

/// Status code carried by responses whose request never produced an HTTP
/// status (network failure, unparseable body, bad URL).
pub const FAILED_STATUS_CODE: i32 = -1;

/// A web service reply naming message UUIDs.
///
/// Only `uuids` (and an optional `error`) come from the wire; `status_code`
/// and `success` describe the exchange that produced the reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UuidListResponse {
    #[serde(skip)]
    pub status_code: i32,
    #[serde(skip)]
    pub success: bool,
    #[serde(alias = "message_uuids", deserialize_with = "null_as_empty")]
    pub uuids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UuidListResponse {
    /// A failed exchange with the given status code.
    pub fn failed(status_code: i32) -> Self {
        Self {
            status_code,
            success: false,
            ..Default::default()
        }
    }

    /// A successful reply naming `uuids`.
    pub fn with_uuids(uuids: Vec<String>) -> Self {
        Self {
            status_code: 200,
            success: true,
            uuids,
            error: None,
        }
    }

    pub fn has_uuids(&self) -> bool {
        !self.uuids.is_empty()
    }
}

/// Reads an explicit `null` list as an empty one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
