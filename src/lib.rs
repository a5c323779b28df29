//! Text-to-image generation against the Runware API.
//!
//! A prompt (and optionally an API key) goes through [`RequestBuilder`],
//! is posted by a [`TaskTransport`] such as [`RunwareClient`], and the decoded
//! body is resolved by the interpreter into an image URL or a classified
//! [`GenerationError`]. [`ImageGenerator`] ties these together with an
//! [`OutcomeSink`] and a [`KeyValueStore`] that remembers the last working key.

pub mod config;
pub mod error;
pub mod generator;
pub mod logger;
pub mod models;
pub mod runware;
pub mod sink;
pub mod storage;

pub use config::{GenerationParams, GeneratorConfig};
pub use error::{GenerationError, Result};
pub use generator::{GeneratorState, ImageGenerator};
pub use models::{CallVariant, GenerationOutcome, GenerationRequest, OutputFormat, Task};
pub use runware::{
    RequestBuilder, RunwareClient, SequenceIdGenerator, TaskIdGenerator, TaskTransport,
    UuidGenerator,
};
pub use sink::{ConsoleSink, Notification, NotificationKind, OutcomeSink};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, API_KEY_STORAGE_KEY};
