use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::{GenerationError, Result},
    models::GenerationRequest,
    runware::{interpreter, RequestBuilder, TaskTransport},
    sink::{Notification, OutcomeSink},
    storage::{KeyValueStore, API_KEY_STORAGE_KEY},
};

pub const SUCCESS_MESSAGE: &str = "Image generated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Pending,
}

/// Drives one prompt at a time from validation through to the sink.
pub struct ImageGenerator {
    builder: RequestBuilder,
    transport: Arc<dyn TaskTransport>,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn OutcomeSink>,
    pending: AtomicBool,
    image: Mutex<Option<String>>,
    saved_api_key: Mutex<Option<String>>,
}

/// Clears the pending flag on every exit path.
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PendingGuard(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ImageGenerator {
    /// Builds the generator and reads the persisted API key once.
    pub async fn initialize(
        builder: RequestBuilder,
        transport: Arc<dyn TaskTransport>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        let saved_api_key = match store.get(API_KEY_STORAGE_KEY).await {
            Ok(key) => key.filter(|k| !k.trim().is_empty()),
            Err(e) => {
                log::warn!("Could not read saved API key, starting without one: {}", e);
                None
            }
        };
        if let Some(key) = &saved_api_key {
            log::debug!("Loaded saved API key {}", mask_key(key));
        }

        Self {
            builder,
            transport,
            store,
            sink,
            pending: AtomicBool::new(false),
            image: Mutex::new(None),
            saved_api_key: Mutex::new(saved_api_key),
        }
    }

    pub fn state(&self) -> GeneratorState {
        if self.pending.load(Ordering::SeqCst) {
            GeneratorState::Pending
        } else {
            GeneratorState::Idle
        }
    }

    /// URL of the last successfully generated image.
    pub fn image(&self) -> Option<String> {
        lock(&self.image).clone()
    }

    pub fn saved_api_key(&self) -> Option<String> {
        lock(&self.saved_api_key).clone()
    }

    /// Whether the submit control would be enabled for these inputs.
    pub fn can_submit(&self, prompt: &str, api_key: Option<&str>) -> bool {
        self.state() == GeneratorState::Idle
            && !prompt.trim().is_empty()
            && api_key.map_or(true, |key| !key.trim().is_empty())
    }

    /// Runs one generation. `api_key` selects the authenticated call shape.
    ///
    /// Rejected with [`GenerationError::Busy`] while another call is pending.
    /// Failures are reported to the sink and leave the current image as is.
    pub async fn submit(&self, prompt: &str, api_key: Option<&str>) -> Result<String> {
        let _guard = match PendingGuard::acquire(&self.pending) {
            Some(guard) => guard,
            None => {
                log::warn!("Submission rejected: a generation is already pending");
                return Err(GenerationError::Busy);
            }
        };

        let request = match self.builder.build(prompt, api_key) {
            Ok(request) => request,
            Err(e) => {
                self.report_failure(&e, None);
                return Err(e);
            }
        };

        log::info!(
            task_uuid = request.task_uuid.as_str();
            "Generating image ({:?}, model {})",
            request.variant(),
            request.model_id
        );

        self.sink.set_pending(true);
        let result = self.exchange(&request).await;
        self.sink.set_pending(false);

        match &result {
            Ok(url) => self.report_success(&request, url).await,
            Err(e) => self.report_failure(e, Some(&request.task_uuid)),
        }
        result
    }

    async fn exchange(&self, request: &GenerationRequest) -> Result<String> {
        let raw = self.transport.submit(&request.tasks()).await?;
        interpreter::interpret(raw, request.variant(), &request.task_uuid)
    }

    async fn report_success(&self, request: &GenerationRequest, url: &str) {
        log::info!(task_uuid = request.task_uuid.as_str(); "Produced {}", url);
        *lock(&self.image) = Some(url.to_string());
        self.sink.render_image(url);
        self.sink.notify(Notification::success(SUCCESS_MESSAGE));

        if let Some(api_key) = &request.api_key {
            // Persistence failures never change the outcome.
            match self.store.set(API_KEY_STORAGE_KEY, api_key).await {
                Ok(()) => {
                    log::debug!("Saved API key {}", mask_key(api_key));
                    *lock(&self.saved_api_key) = Some(api_key.clone());
                }
                Err(e) => log::warn!("Could not persist API key: {}", e),
            }
        }
    }

    fn report_failure(&self, err: &GenerationError, task_uuid: Option<&str>) {
        match (err, task_uuid) {
            (GenerationError::Validation(msg), _) => log::warn!("Validation failed: {}", msg),
            (other, Some(task_uuid)) => {
                log::error!(task_uuid = task_uuid; "Generation failed: {}", other)
            }
            (other, None) => log::error!("Generation failed: {}", other),
        }
        self.sink.notify(Notification::error(err.user_message()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}****", prefix)
}
