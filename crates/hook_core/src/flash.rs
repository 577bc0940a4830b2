use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{sleep, Duration},
};
use tracing::{debug, warn};

use shared::domain::{Element, FlashKind};

use crate::{DomSink, EventSink, LiveHook};

pub const CLEAR_FLASH_EVENT: &str = "lv:clear-flash";

const KIND_ATTR: &str = "kind";
const HIDDEN_CLASS: &str = "opacity-0";

/// How long the flash stays fully visible.
const HIDE_DELAY: Duration = Duration::from_secs(5);
/// Extra lag between hiding the element and clearing the flash server-side,
/// so the fade-out finishes before the element is removed.
const CLEAR_LAG: Duration = Duration::from_secs(1);

/// Fades a flash message out after a fixed delay, then asks the server to
/// clear it so it does not reappear on the next patch.
pub struct ClearFlashHook {
    el: Element,
    kind: Option<FlashKind>,
    events: Arc<dyn EventSink>,
    dom: Arc<dyn DomSink>,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

impl ClearFlashHook {
    pub fn mount(el: Element, events: Arc<dyn EventSink>, dom: Arc<dyn DomSink>) -> Self {
        let kind = el.dataset.get(KIND_ATTR).and_then(FlashKind::parse);
        if kind.is_none() {
            debug!(element = %el.id.0, "flash element has no recognized data-kind");
        }
        Self {
            el,
            kind,
            events,
            dom,
            timers: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LiveHook for ClearFlashHook {
    async fn on_attach(&self) -> Result<()> {
        let hide = {
            let target = self.el.id.clone();
            let dom = Arc::clone(&self.dom);
            tokio::spawn(async move {
                sleep(HIDE_DELAY).await;
                dom.add_class(&target, HIDDEN_CLASS);
            })
        };

        let clear = {
            let target = self.el.id.clone();
            let events = Arc::clone(&self.events);
            let kind = self.kind;
            tokio::spawn(async move {
                sleep(HIDE_DELAY + CLEAR_LAG).await;
                let mut params = Map::new();
                if let Some(kind) = kind {
                    params.insert("key".to_string(), Value::String(kind.as_str().to_string()));
                }
                if let Err(err) = events.push_event_to(&target, CLEAR_FLASH_EVENT, params).await {
                    warn!(target = %target.0, error = %err, "failed to clear flash");
                }
            })
        };

        self.timers.lock().await.extend([hide, clear]);
        Ok(())
    }

    async fn on_detach(&self) {
        for timer in self.timers.lock().await.drain(..) {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/flash_tests.rs"]
mod tests;
