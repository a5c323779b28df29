pub mod interpreter;
pub mod request_builder;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::{
    config::GeneratorConfig,
    error::{GenerationError, Result},
    logger,
    models::{OutputFormat, RawResponse, Task},
};

pub use request_builder::{RequestBuilder, SequenceIdGenerator, TaskIdGenerator, UuidGenerator};

/// Carries one task list to the vendor and returns the decoded body.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    async fn submit(&self, tasks: &[Task]) -> Result<RawResponse>;
}

#[derive(Clone)]
pub struct RunwareClient {
    client: Client,
    endpoint: String,
}

impl RunwareClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    // The API key travels in-band as an authentication task, never as a header.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Fetches the bytes behind a result image URL.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Downloading image from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::Network(format!("image download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GenerationError::Network(format!(
                "image download failed: HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Downloads the image to `path` and returns where it was written. A path
    /// without an extension gets the one matching `format`.
    pub async fn save_image(&self, url: &str, path: &Path, format: OutputFormat) -> Result<PathBuf> {
        let target = output_path(path, format);
        let bytes = self.download_image(url).await?;
        tokio::fs::write(&target, bytes).await.map_err(|e| {
            GenerationError::Storage(format!("failed to write {}: {}", target.display(), e))
        })?;
        Ok(target)
    }
}

fn output_path(path: &Path, format: OutputFormat) -> PathBuf {
    match path.extension() {
        Some(_) => path.to_path_buf(),
        None => path.with_extension(format.extension()),
    }
}

#[async_trait]
impl TaskTransport for RunwareClient {
    async fn submit(&self, tasks: &[Task]) -> Result<RawResponse> {
        let _timer = logger::timer("runware exchange");
        log::info!(
            "Submitting {} task(s) to {}: [{}]",
            tasks.len(),
            self.endpoint,
            tasks
                .iter()
                .map(Task::task_type)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers())
            .json(tasks)
            .send()
            .await
            .map_err(|e| GenerationError::Network(format!("Runware request failed: {}", e)))?;

        // Error bodies arrive with non-2xx statuses too, so the status alone
        // decides nothing.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(format!("reading response failed: {}", e)))?;

        log::debug!("Runware responded with HTTP {} ({} bytes)", status, body.len());

        serde_json::from_str::<RawResponse>(&body).map_err(|e| {
            GenerationError::Network(format!(
                "undecodable response (HTTP {}): {}",
                status.as_u16(),
                e
            ))
        })
    }
}
