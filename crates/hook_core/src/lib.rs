use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;

use shared::{
    domain::{Element, ElementId},
    error::ChannelError,
    protocol::ServerEvent,
};

pub mod error;
mod flash;
mod sortable;
mod sound;
mod uploader;

pub use error::TransferError;
pub use flash::ClearFlashHook;
pub use sortable::{DragEnd, DragGroup, SortableConfig, SortableHook};
pub use sound::{SoundClip, SoundEffectHook};
pub use uploader::{DirectUploadClient, UploadEntry, UploadEvent};

/// Outbound request channel to the server, addressed per element.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn push_event_to(
        &self,
        target: &ElementId,
        event: &str,
        params: Map<String, Value>,
    ) -> Result<(), ChannelError>;
}

/// Minimal DOM mutation surface exposed by the host runtime.
pub trait DomSink: Send + Sync {
    fn add_class(&self, target: &ElementId, class: &str);
}

/// Sound playback surface exposed by the host runtime.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, clip: SoundClip);
}

pub struct MissingEventSink;

#[async_trait]
impl EventSink for MissingEventSink {
    async fn push_event_to(
        &self,
        target: &ElementId,
        event: &str,
        _params: Map<String, Value>,
    ) -> Result<(), ChannelError> {
        warn!(target = %target.0, event, "no live channel attached; dropping event");
        Err(ChannelError::Detached)
    }
}

pub struct MissingDomSink;

impl DomSink for MissingDomSink {
    fn add_class(&self, target: &ElementId, class: &str) {
        warn!(target = %target.0, class, "no DOM surface attached; dropping class change");
    }
}

pub struct MissingAudioPlayer;

impl AudioPlayer for MissingAudioPlayer {
    fn play(&self, clip: SoundClip) {
        warn!(?clip, "no audio surface attached; dropping playback");
    }
}

/// A focus-loss event bubbling up from inside a hook's element.
#[derive(Debug, Default)]
pub struct FocusOut {
    stopped: bool,
}

impl FocusOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// Lifecycle of one mounted element behavior. The host runtime attaches a
/// hook right after constructing it and detaches it when the element goes
/// away; server-pushed events addressed to the element are delivered in
/// between.
#[async_trait]
pub trait LiveHook: Send + Sync {
    async fn on_attach(&self) -> Result<()> {
        Ok(())
    }

    async fn on_detach(&self) {}

    async fn on_server_event(&self, _event: &ServerEvent) -> Result<()> {
        Ok(())
    }
}

pub type HookFactory = Arc<dyn Fn(Element) -> Arc<dyn LiveHook> + Send + Sync>;

/// Name-keyed hook constructors, mirroring the hook table the host runtime
/// is configured with.
#[derive(Default)]
pub struct HookRegistry {
    factories: HashMap<&'static str, HookFactory>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the stock hooks under the names the host
    /// runtime uses for them.
    pub fn with_defaults(
        events: Arc<dyn EventSink>,
        dom: Arc<dyn DomSink>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        let mut registry = Self::new();
        {
            let events = Arc::clone(&events);
            registry.register(
                "Sortable",
                Arc::new(move |el| {
                    Arc::new(SortableHook::mount(el, Arc::clone(&events))) as Arc<dyn LiveHook>
                }),
            );
        }
        {
            let events = Arc::clone(&events);
            let dom = Arc::clone(&dom);
            registry.register(
                "ClearFlash",
                Arc::new(move |el| {
                    Arc::new(ClearFlashHook::mount(
                        el,
                        Arc::clone(&events),
                        Arc::clone(&dom),
                    )) as Arc<dyn LiveHook>
                }),
            );
        }
        registry.register(
            "LessonSoundEffect",
            Arc::new(move |_el| Arc::new(SoundEffectHook::new(Arc::clone(&audio))) as Arc<dyn LiveHook>),
        );
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: HookFactory) {
        self.factories.insert(name, factory);
    }

    /// Constructs the hook registered under `name` for `el`. The caller owns
    /// the returned hook and drives its lifecycle.
    pub fn mount(&self, name: &str, el: Element) -> Option<Arc<dyn LiveHook>> {
        self.factories.get(name).map(|factory| factory(el))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
