use serde::{Deserialize, Serialize};

use super::common::OutputFormat;

/// One unit of work in a vendor call. The wire object carries the variant
/// name in its `taskType` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "taskType", rename_all = "camelCase")]
pub enum Task {
    Authentication {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    ImageInference(ImageInferenceTask),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInferenceTask {
    #[serde(rename = "taskUUID")]
    pub task_uuid: String,
    #[serde(rename = "positivePrompt")]
    pub positive_prompt: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "numberResults")]
    pub number_results: u32,
    #[serde(rename = "outputFormat")]
    pub output_format: OutputFormat,
}

impl Task {
    pub fn task_type(&self) -> &'static str {
        match self {
            Task::Authentication { .. } => super::common::TASK_TYPE_AUTHENTICATION,
            Task::ImageInference(_) => super::common::TASK_TYPE_IMAGE_INFERENCE,
        }
    }
}
