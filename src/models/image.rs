use serde::{Deserialize, Serialize};

use super::common::OutputFormat;
use super::task::{ImageInferenceTask, Task};

/// Which call shape a request uses. The vendor reports errors differently for
/// each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallVariant {
    Anonymous,
    Authenticated,
}

/// A validated request, ready to be turned into wire tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub api_key: Option<String>,
    pub task_uuid: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub number_results: u32,
    pub output_format: OutputFormat,
}

impl GenerationRequest {
    pub fn variant(&self) -> CallVariant {
        if self.api_key.is_some() {
            CallVariant::Authenticated
        } else {
            CallVariant::Anonymous
        }
    }

    /// Authentication first (when a key is present), then the inference task.
    pub fn tasks(&self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(2);
        if let Some(api_key) = &self.api_key {
            tasks.push(Task::Authentication {
                api_key: api_key.clone(),
            });
        }
        tasks.push(Task::ImageInference(ImageInferenceTask {
            task_uuid: self.task_uuid.clone(),
            positive_prompt: self.prompt_text.clone(),
            model: self.model_id.clone(),
            width: self.width,
            height: self.height,
            number_results: self.number_results,
            output_format: self.output_format,
        }));
        tasks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationOutcome {
    Success(String),
    Failure(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}

impl From<&crate::error::Result<String>> for GenerationOutcome {
    fn from(result: &crate::error::Result<String>) -> Self {
        match result {
            Ok(url) => GenerationOutcome::Success(url.clone()),
            Err(err) => GenerationOutcome::Failure(err.user_message()),
        }
    }
}
