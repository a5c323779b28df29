use thiserror::Error;

/// Shown when the exchange itself failed (connection, undecodable body).
pub const NETWORK_FAILURE_MESSAGE: &str = "Failed to generate image. Please try again.";
/// Shown when the vendor reported an error without a usable message.
pub const VENDOR_FALLBACK_MESSAGE: &str = "Failed to generate image";
pub const EMPTY_RESULT_MESSAGE: &str = "No image was generated";
pub const BUSY_MESSAGE: &str = "A generation is already in progress";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Vendor error: {0}")]
    Vendor(String),

    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,

    #[error("{}", BUSY_MESSAGE)]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GenerationError {
    /// Text for the failure notification. Network details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Validation(msg) => msg.clone(),
            GenerationError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            GenerationError::Vendor(msg) if !msg.trim().is_empty() => msg.clone(),
            GenerationError::Vendor(_) => VENDOR_FALLBACK_MESSAGE.to_string(),
            GenerationError::EmptyResult => EMPTY_RESULT_MESSAGE.to_string(),
            GenerationError::Busy => BUSY_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
