use super::*;
use serde_json::json;
use std::sync::Mutex as StdMutex;
use tokio::time::advance;

use shared::{
    domain::{Dataset, ElementId},
    error::ChannelError,
    protocol::PushEvent,
};

struct RecordingSink {
    pushed: Mutex<Vec<PushEvent>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            pushed: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn push_event_to(
        &self,
        target: &ElementId,
        event: &str,
        params: Map<String, Value>,
    ) -> Result<(), ChannelError> {
        self.pushed.lock().await.push(PushEvent {
            target: target.clone(),
            event: event.to_string(),
            params,
        });
        Ok(())
    }
}

struct RecordingDom {
    classes: StdMutex<Vec<(ElementId, String)>>,
}

impl RecordingDom {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            classes: StdMutex::new(Vec::new()),
        })
    }
}

impl DomSink for RecordingDom {
    fn add_class(&self, target: &ElementId, class: &str) {
        self.classes
            .lock()
            .expect("lock")
            .push((target.clone(), class.to_string()));
    }
}

fn dataset(pairs: &[(&str, &str)]) -> Dataset {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Lets tasks woken by the paused clock run to completion.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn hides_then_clears_flash_on_schedule() {
    let sink = RecordingSink::new();
    let dom = RecordingDom::new();
    let el = Element::new("flash-info", dataset(&[("kind", "info")]));
    let hook = ClearFlashHook::mount(
        el,
        Arc::clone(&sink) as Arc<dyn EventSink>,
        Arc::clone(&dom) as Arc<dyn DomSink>,
    );
    hook.on_attach().await.expect("attach");
    settle().await;

    advance(Duration::from_millis(5_100)).await;
    settle().await;

    {
        let classes = dom.classes.lock().expect("lock");
        assert_eq!(
            classes.as_slice(),
            &[(ElementId::new("flash-info"), "opacity-0".to_string())]
        );
    }
    assert!(sink.pushed.lock().await.is_empty());

    advance(Duration::from_millis(1_000)).await;
    settle().await;

    let pushed = sink.pushed.lock().await;
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].target, ElementId::new("flash-info"));
    assert_eq!(pushed[0].event, CLEAR_FLASH_EVENT);
    assert_eq!(pushed[0].params["key"], json!("info"));
}

#[tokio::test(start_paused = true)]
async fn detach_cancels_pending_timers() {
    let sink = RecordingSink::new();
    let dom = RecordingDom::new();
    let el = Element::new("flash-error", dataset(&[("kind", "error")]));
    let hook = ClearFlashHook::mount(
        el,
        Arc::clone(&sink) as Arc<dyn EventSink>,
        Arc::clone(&dom) as Arc<dyn DomSink>,
    );
    hook.on_attach().await.expect("attach");
    settle().await;
    hook.on_detach().await;

    advance(Duration::from_secs(10)).await;
    settle().await;

    assert!(dom.classes.lock().expect("lock").is_empty());
    assert!(sink.pushed.lock().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unrecognized_kind_clears_without_key() {
    let sink = RecordingSink::new();
    let dom = RecordingDom::new();
    let el = Element::new("flash-misc", dataset(&[("kind", "celebration")]));
    let hook = ClearFlashHook::mount(
        el,
        Arc::clone(&sink) as Arc<dyn EventSink>,
        Arc::clone(&dom) as Arc<dyn DomSink>,
    );
    hook.on_attach().await.expect("attach");
    settle().await;

    advance(Duration::from_secs(7)).await;
    settle().await;

    let pushed = sink.pushed.lock().await;
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].event, CLEAR_FLASH_EVENT);
    assert!(pushed[0].params.is_empty());
}
