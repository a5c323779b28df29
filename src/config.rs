use std::env;
use std::path::PathBuf;

use crate::error::{GenerationError, Result};
use crate::models::OutputFormat;

pub const DEFAULT_ENDPOINT: &str = "https://api.runware.ai/v1";
pub const DEFAULT_MODEL: &str = "runware:100@1";
pub const DEFAULT_DIMENSION: u32 = 1024;
pub const DEFAULT_KEY_STORE: &str = ".imagegen.json";

/// Fixed parameters attached to every image-inference task.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub number_results: u32,
    pub output_format: OutputFormat,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            model_id: DEFAULT_MODEL.to_string(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            number_results: 1,
            output_format: OutputFormat::Webp,
        }
    }
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let model_id = env::var("RUNWARE_MODEL").unwrap_or(defaults.model_id);
        let width = env::var("RUNWARE_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("RUNWARE_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.height);
        let number_results = env::var("RUNWARE_NUMBER_RESULTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.number_results);
        let output_format = env::var("RUNWARE_OUTPUT_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.output_format);

        GenerationParams {
            model_id,
            width,
            height,
            number_results,
            output_format,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub params: GenerationParams,
    pub api_key: Option<String>,
    pub key_store_path: PathBuf,
    pub log_level: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            params: GenerationParams::default(),
            api_key: None,
            key_store_path: PathBuf::from(DEFAULT_KEY_STORE),
            log_level: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint =
            env::var("RUNWARE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let api_key = env::var("RUNWARE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let key_store_path = env::var("IMAGEGEN_KEY_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KEY_STORE));
        let log_level = env::var("IMAGEGEN_LOG_LEVEL").ok();

        GeneratorConfig {
            endpoint,
            params: GenerationParams::from_env(),
            api_key,
            key_store_path,
            log_level,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_key_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_store_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(GenerationError::Config("endpoint must not be empty".into()));
        }
        if self.params.model_id.trim().is_empty() {
            return Err(GenerationError::Config("model id must not be empty".into()));
        }
        if self.params.width == 0 || self.params.height == 0 {
            return Err(GenerationError::Config(format!(
                "invalid dimensions {}x{}",
                self.params.width, self.params.height
            )));
        }
        if self.params.number_results == 0 {
            return Err(GenerationError::Config(
                "number of results must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_vendor_call() {
        let config = GeneratorConfig::default();
        assert_eq!(config.endpoint, "https://api.runware.ai/v1");
        assert_eq!(config.params.model_id, "runware:100@1");
        assert_eq!((config.params.width, config.params.height), (1024, 1024));
        assert_eq!(config.params.number_results, 1);
        assert_eq!(config.params.output_format, OutputFormat::Webp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let config = GeneratorConfig::new()
            .with_params(GenerationParams::new().with_dimensions(0, 512));
        assert!(matches!(config.validate(), Err(GenerationError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_endpoint() {
        let config = GeneratorConfig::new().with_endpoint("  ");
        assert!(config.validate().is_err());
    }
}
