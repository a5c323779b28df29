mod common;

use common::generator_with;
use common::mocks::{MockTransport, RecordingSink, SinkEvent};
use pretty_assertions::assert_eq;
use runware_imagegen::{
    error::{EMPTY_RESULT_MESSAGE, NETWORK_FAILURE_MESSAGE},
    generator::SUCCESS_MESSAGE,
    GenerationError, GeneratorState, ImageGenerator, KeyValueStore, MemoryStore,
    Notification, NotificationKind, Task, API_KEY_STORAGE_KEY,
};
use serde_json::json;
use std::sync::Arc;

fn image_body(url: &str) -> serde_json::Value {
    json!({ "data": [{ "taskType": "imageInference", "taskUUID": "task-1", "imageURL": url }] })
}

#[tokio::test]
async fn test_blank_prompt_never_reaches_the_network() {
    let transport = Arc::new(MockTransport::new());
    let (generator, sink) = generator_with(transport.clone(), Arc::new(MemoryStore::new())).await;

    for prompt in ["", "   ", "\n\t"] {
        let err = generator.submit(prompt, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    assert_eq!(transport.call_count(), 0);
    assert_eq!(sink.notifications().len(), 3);
    assert!(sink
        .notifications()
        .iter()
        .all(|n| n.kind == NotificationKind::Error && n.message == "Please enter a prompt first"));
    assert_eq!(generator.state(), GeneratorState::Idle);
}

#[tokio::test]
async fn test_blank_api_key_never_reaches_the_network() {
    let transport = Arc::new(MockTransport::new());
    let (generator, sink) = generator_with(transport.clone(), Arc::new(MemoryStore::new())).await;

    for key in ["", "  "] {
        let err = generator.submit("a castle", Some(key)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    assert_eq!(transport.call_count(), 0);
    assert_eq!(
        sink.notifications()[0],
        Notification::error("Please enter your API key")
    );
}

#[tokio::test]
async fn test_anonymous_success_renders_and_notifies() {
    let transport = Arc::new(MockTransport::new().with_json(image_body("https://im.runware.ai/a.webp")));
    let store = Arc::new(MemoryStore::new());
    let (generator, sink) = generator_with(transport.clone(), store.clone()).await;

    let url = generator.submit("  a castle at dawn ", None).await.unwrap();

    assert_eq!(url, "https://im.runware.ai/a.webp");
    assert_eq!(generator.image().as_deref(), Some("https://im.runware.ai/a.webp"));
    assert_eq!(
        sink.events(),
        vec![
            SinkEvent::Pending(true),
            SinkEvent::Pending(false),
            SinkEvent::Rendered("https://im.runware.ai/a.webp".into()),
            SinkEvent::Notified(Notification::success(SUCCESS_MESSAGE)),
        ]
    );

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    match &calls[0][0] {
        Task::ImageInference(task) => {
            assert_eq!(task.task_uuid, "task-1");
            assert_eq!(task.positive_prompt, "a castle at dawn");
        }
        other => panic!("unexpected task {:?}", other),
    }

    // Nothing to persist without a key.
    assert_eq!(store.get(API_KEY_STORAGE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_authenticated_success_persists_key_for_next_session() {
    let transport = Arc::new(MockTransport::new().with_json(image_body("https://im.runware.ai/b.webp")));
    let store = Arc::new(MemoryStore::new());
    let (generator, _sink) = generator_with(transport.clone(), store.clone()).await;
    assert_eq!(generator.saved_api_key(), None);

    generator.submit("a castle", Some(" rw-key-1 ")).await.unwrap();

    let calls = transport.calls();
    assert_eq!(
        calls[0][0],
        Task::Authentication {
            api_key: "rw-key-1".into()
        }
    );
    assert_eq!(generator.saved_api_key().as_deref(), Some("rw-key-1"));

    let (next_session, _) = generator_with(Arc::new(MockTransport::new()), store).await;
    assert_eq!(next_session.saved_api_key().as_deref(), Some("rw-key-1"));
}

#[tokio::test]
async fn test_failed_authenticated_call_does_not_persist_key() {
    let transport = Arc::new(
        MockTransport::new().with_json(json!({ "errors": [{ "message": "Invalid API key" }] })),
    );
    let store = Arc::new(MemoryStore::new());
    let (generator, sink) = generator_with(transport, store.clone()).await;

    let err = generator.submit("a castle", Some("bad")).await.unwrap_err();

    assert!(matches!(err, GenerationError::Vendor(ref m) if m == "Invalid API key"));
    assert_eq!(sink.notifications(), vec![Notification::error("Invalid API key")]);
    assert_eq!(store.get(API_KEY_STORAGE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_failures_keep_the_previous_image() {
    let transport = Arc::new(
        MockTransport::new()
            .with_json(image_body("https://im.runware.ai/first.webp"))
            .with_json(json!({ "error": "Prompt rejected" }))
            .with_json(json!({ "data": [] }))
            .with_network_error("connection reset"),
    );
    let (generator, sink) = generator_with(transport, Arc::new(MemoryStore::new())).await;

    generator.submit("first", None).await.unwrap();
    assert!(generator.submit("second", None).await.is_err());
    assert!(generator.submit("third", None).await.is_err());
    assert!(generator.submit("fourth", None).await.is_err());

    assert_eq!(generator.image().as_deref(), Some("https://im.runware.ai/first.webp"));
    assert_eq!(sink.rendered(), vec!["https://im.runware.ai/first.webp".to_string()]);
    assert_eq!(
        sink.notifications(),
        vec![
            Notification::success(SUCCESS_MESSAGE),
            Notification::error("Prompt rejected"),
            Notification::error(EMPTY_RESULT_MESSAGE),
            Notification::error(NETWORK_FAILURE_MESSAGE),
        ]
    );
    assert_eq!(generator.state(), GeneratorState::Idle);
}

#[tokio::test]
async fn test_second_submission_is_rejected_while_pending() {
    let (transport, gate) = MockTransport::new()
        .with_json(image_body("https://im.runware.ai/c.webp"))
        .gated();
    let transport = Arc::new(transport);
    let sink = Arc::new(RecordingSink::new());
    let generator = ImageGenerator::initialize(
        common::sequence_builder(),
        transport.clone(),
        Arc::new(MemoryStore::new()),
        sink.clone(),
    )
    .await;

    let (first, second, _) = tokio::join!(
        generator.submit("first", None),
        async {
            assert_eq!(generator.state(), GeneratorState::Pending);
            assert!(!generator.can_submit("second", None));
            generator.submit("second", None).await
        },
        async { gate.notify_one() },
    );

    assert_eq!(first.unwrap(), "https://im.runware.ai/c.webp");
    assert!(matches!(second, Err(GenerationError::Busy)));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(generator.state(), GeneratorState::Idle);
    assert!(generator.can_submit("again", None));
}

#[tokio::test]
async fn test_can_submit_mirrors_required_fields() {
    let (generator, _) =
        generator_with(Arc::new(MockTransport::new()), Arc::new(MemoryStore::new())).await;

    assert!(!generator.can_submit(" ", None));
    assert!(generator.can_submit("a castle", None));
    assert!(!generator.can_submit("a castle", Some("")));
    assert!(generator.can_submit("a castle", Some("key")));
}

#[tokio::test]
async fn test_saved_key_is_read_at_initialization() {
    let store = Arc::new(MemoryStore::new().with_entry(API_KEY_STORAGE_KEY, "stored-key"));
    let (generator, _) = generator_with(Arc::new(MockTransport::new()), store).await;
    assert_eq!(generator.saved_api_key().as_deref(), Some("stored-key"));
}
