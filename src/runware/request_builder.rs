use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::GenerationParams,
    error::{GenerationError, Result},
    models::GenerationRequest,
};

pub const MISSING_PROMPT_MESSAGE: &str = "Please enter a prompt first";
pub const MISSING_API_KEY_MESSAGE: &str = "Please enter your API key";

/// Source of per-call task identifiers.
pub trait TaskIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl TaskIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids (`{prefix}-1`, `{prefix}-2`, ...) for replayable request bodies.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl TaskIdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[derive(Clone)]
pub struct RequestBuilder {
    params: GenerationParams,
    ids: Arc<dyn TaskIdGenerator>,
}

impl RequestBuilder {
    pub fn new(params: GenerationParams, ids: Arc<dyn TaskIdGenerator>) -> Self {
        Self { params, ids }
    }

    pub fn with_uuid_ids(params: GenerationParams) -> Self {
        Self::new(params, Arc::new(UuidGenerator))
    }

    /// Validates the inputs and assigns a fresh task id. `api_key` is `Some`
    /// when the caller chose the authenticated variant, even if it is blank.
    pub fn build(&self, prompt: &str, api_key: Option<&str>) -> Result<GenerationRequest> {
        let prompt_text = prompt.trim();
        if prompt_text.is_empty() {
            return Err(GenerationError::Validation(MISSING_PROMPT_MESSAGE.into()));
        }

        let api_key = match api_key.map(str::trim) {
            Some("") => {
                return Err(GenerationError::Validation(MISSING_API_KEY_MESSAGE.into()));
            }
            Some(key) => Some(key.to_string()),
            None => None,
        };

        Ok(GenerationRequest {
            prompt_text: prompt_text.to_string(),
            api_key,
            task_uuid: self.ids.next_id(),
            model_id: self.params.model_id.clone(),
            width: self.params.width,
            height: self.params.height,
            number_results: self.params.number_results,
            output_format: self.params.output_format,
        })
    }
}
