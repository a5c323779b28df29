#![allow(dead_code)]

pub mod mocks;

use runware_imagegen::{
    GenerationParams, ImageGenerator, KeyValueStore, RequestBuilder, SequenceIdGenerator,
    TaskTransport,
};
use std::sync::Arc;

use mocks::RecordingSink;

pub fn sequence_builder() -> RequestBuilder {
    RequestBuilder::new(
        GenerationParams::default(),
        Arc::new(SequenceIdGenerator::new("task")),
    )
}

pub async fn generator_with(
    transport: Arc<dyn TaskTransport>,
    store: Arc<dyn KeyValueStore>,
) -> (ImageGenerator, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let generator =
        ImageGenerator::initialize(sequence_builder(), transport, store, sink.clone()).await;
    (generator, sink)
}
