use async_trait::async_trait;
use runware_imagegen::{
    models::RawResponse, GenerationError, Notification, OutcomeSink, Result, Task, TaskTransport,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Transport that replays canned bodies and records every task list it sees.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    calls: Mutex<Vec<Vec<Task>>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn with_json(self, body: Value) -> Self {
        let raw = serde_json::from_value(body).expect("test body must decode");
        self.responses.lock().unwrap().push_back(Ok(raw));
        self
    }

    pub fn with_network_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(GenerationError::Network(message.to_string())));
        self
    }

    /// Holds every exchange until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<Vec<Task>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskTransport for MockTransport {
    async fn submit(&self, tasks: &[Task]) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(tasks.to_vec());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Network("no mock response left".into())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Pending(bool),
    Rendered(String),
    Notified(Notification),
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Notified(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Rendered(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl OutcomeSink for RecordingSink {
    fn render_image(&self, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Rendered(url.to_string()));
    }

    fn notify(&self, notification: Notification) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Notified(notification));
    }

    fn set_pending(&self, pending: bool) {
        self.events.lock().unwrap().push(SinkEvent::Pending(pending));
    }
}
