use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::TASK_TYPE_IMAGE_INFERENCE;

/// Vendor response body as it arrives. Only the envelope is typed; each
/// shape is decoded when a call variant asks for it, so a malformed field
/// the variant never reads cannot fail the exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RawResponse {
    /// Entries of the `errors` list. Anything but a list reads as empty.
    pub fn error_entries(&self) -> Vec<ErrorEntry> {
        decode_items(self.errors.as_ref())
    }

    /// Records of the `data` list; entries that do not decode are skipped.
    pub fn records(&self) -> Vec<ResultRecord> {
        decode_items(self.data.as_ref())
    }
}

fn decode_items<T: for<'de> Deserialize<'de>>(list: Option<&Value>) -> Vec<T> {
    list.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match serde_json::from_value(item.clone()) {
                    Ok(decoded) => Some(decoded),
                    Err(e) => {
                        log::debug!("Skipping undecodable response entry: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorEntry {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(rename = "taskUUID", default)]
    pub task_uuid: Option<Value>,
}

impl ErrorEntry {
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
    }
}

/// One entry of `data`. Only the fields the interpreter reads are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    #[serde(rename = "taskType", default)]
    pub task_type: Value,
    #[serde(rename = "taskUUID", default)]
    pub task_uuid: Option<Value>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<Value>,
}

impl ResultRecord {
    pub fn is_image_inference(&self) -> bool {
        self.task_type.as_str() == Some(TASK_TYPE_IMAGE_INFERENCE)
    }

    pub fn task_uuid(&self) -> Option<&str> {
        self.task_uuid.as_ref().and_then(Value::as_str)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_ref()
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Error shapes the vendor uses, one variant per shape.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorFailure {
    /// Single top-level `error` (anonymous calls).
    Message(Value),
    /// Top-level `errors` list (calls that carry an API key).
    Entries(Vec<ErrorEntry>),
}

/// Decoded response, classified for one call variant.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    Failed(VendorFailure),
    Results(Vec<ResultRecord>),
}
