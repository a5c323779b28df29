use serde_json::Value;

use crate::{
    error::{GenerationError, Result, VENDOR_FALLBACK_MESSAGE},
    models::{CallVariant, GenerationResponse, RawResponse, ResultRecord, VendorFailure},
};

/// Picks the error shape that belongs to `variant`; the other shape is never
/// decoded.
pub fn classify(raw: RawResponse, variant: CallVariant) -> GenerationResponse {
    let failure = match variant {
        CallVariant::Anonymous => raw
            .error
            .clone()
            .filter(is_truthy)
            .map(VendorFailure::Message),
        CallVariant::Authenticated => raw
            .errors
            .as_ref()
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty())
            .map(|_| VendorFailure::Entries(raw.error_entries())),
    };

    match failure {
        Some(failure) => GenerationResponse::Failed(failure),
        None => GenerationResponse::Results(raw.records()),
    }
}

/// Resolves a decoded body to the image URL for `task_uuid`.
pub fn interpret(raw: RawResponse, variant: CallVariant, task_uuid: &str) -> Result<String> {
    match classify(raw, variant) {
        GenerationResponse::Failed(failure) => {
            let reason = failure.reason();
            log::warn!(task_uuid = task_uuid; "Vendor rejected the task: {}", reason);
            Err(GenerationError::Vendor(reason))
        }
        GenerationResponse::Results(records) => select_image(&records, task_uuid)
            .and_then(ResultRecord::image_url)
            .map(str::to_string)
            .ok_or(GenerationError::EmptyResult),
    }
}

/// The inference record for our task, or the first inference record if none
/// echoes the task id.
fn select_image<'a>(records: &'a [ResultRecord], task_uuid: &str) -> Option<&'a ResultRecord> {
    let mut inference = records.iter().filter(|record| record.is_image_inference());
    let first = inference.clone().next();
    inference
        .find(|record| record.task_uuid() == Some(task_uuid))
        .or(first)
}

impl VendorFailure {
    pub fn reason(&self) -> String {
        let reason = match self {
            VendorFailure::Message(Value::String(msg)) => Some(msg.trim()),
            VendorFailure::Message(_) => None,
            VendorFailure::Entries(entries) => entries.first().and_then(|entry| entry.message()),
        };
        reason
            .filter(|msg| !msg.is_empty())
            .unwrap_or(VENDOR_FALLBACK_MESSAGE)
            .to_string()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
