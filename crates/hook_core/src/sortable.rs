use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use shared::{
    domain::{Dataset, Element},
    error::ChannelError,
    protocol::reposition_params,
};

use crate::{EventSink, FocusOut, LiveHook};

/// Event name a finished gesture is reported under when the container does
/// not override it via `data-drop`.
pub const DEFAULT_DROP_EVENT: &str = "reposition";

const GROUP_ATTR: &str = "group";
const DROP_ATTR: &str = "drop";

pub const DRAG_ANIMATION_MS: u64 = 150;
pub const FILTERED_CLASS: &str = "filtered";
pub const DRAG_CLASS: &str = "drag-item";
pub const GHOST_CLASS: &str = "drag-ghost";

/// Cross-container drag membership. Containers sharing a group name may
/// exchange items in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGroup {
    pub name: String,
    pub pull: bool,
    pub put: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableConfig {
    pub group: Option<DragGroup>,
    pub drop_event: Option<String>,
    pub animation_ms: u64,
    pub filtered_class: String,
    pub drag_class: String,
    pub ghost_class: String,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            group: None,
            drop_event: None,
            animation_ms: DRAG_ANIMATION_MS,
            filtered_class: FILTERED_CLASS.to_string(),
            drag_class: DRAG_CLASS.to_string(),
            ghost_class: GHOST_CLASS.to_string(),
        }
    }
}

impl SortableConfig {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            group: dataset.get(GROUP_ATTR).map(|name| DragGroup {
                name: name.to_string(),
                pull: true,
                put: true,
            }),
            drop_event: dataset.get(DROP_ATTR).map(str::to_string),
            ..Self::default()
        }
    }

    pub fn drop_event(&self) -> &str {
        self.drop_event.as_deref().unwrap_or(DEFAULT_DROP_EVENT)
    }
}

/// Raw outcome of one drag gesture as observed by the host's drag layer.
#[derive(Debug, Clone)]
pub struct DragEnd {
    pub old_index: usize,
    pub new_index: usize,
    /// Attributes of the container the item landed in.
    pub to: Dataset,
    /// Attributes of the moved item.
    pub item: Dataset,
}

/// Makes a container's children reorderable and reports each finished
/// gesture as one outbound event addressed to the container.
pub struct SortableHook {
    el: Element,
    config: SortableConfig,
    dragging: AtomicBool,
    events: Arc<dyn EventSink>,
}

impl SortableHook {
    pub fn mount(el: Element, events: Arc<dyn EventSink>) -> Self {
        let config = SortableConfig::from_dataset(&el.dataset);
        Self {
            el,
            config,
            dragging: AtomicBool::new(false),
            events,
        }
    }

    pub fn config(&self) -> &SortableConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    /// Gesture start. Until the matching [`drag_ended`](Self::drag_ended),
    /// focus-loss events are suppressed so host-level blur handling cannot
    /// fire mid-drag.
    pub fn drag_started(&self) {
        self.dragging.store(true, Ordering::SeqCst);
    }

    /// Gesture end: clears the in-progress flag and reports the index pair
    /// plus the destination and item attributes under the configured event
    /// name.
    pub async fn drag_ended(&self, end: DragEnd) -> Result<(), ChannelError> {
        self.dragging.store(false, Ordering::SeqCst);
        debug!(
            container = %self.el.id.0,
            old = end.old_index,
            new = end.new_index,
            "drag gesture finished"
        );
        let params = reposition_params(end.old_index, end.new_index, &end.to, &end.item);
        self.events
            .push_event_to(&self.el.id, self.config.drop_event(), params)
            .await
    }

    /// Capturing focus-out filter for the container.
    pub fn on_focus_out(&self, event: &mut FocusOut) {
        if self.is_dragging() {
            event.stop_immediate_propagation();
        }
    }

    /// Whether an item dragged out of a container configured as `source`
    /// may be dropped here. Absent or mismatched groups silently degrade to
    /// same-container dragging.
    pub fn allows_transfer_from(&self, source: &SortableConfig) -> bool {
        match (&self.config.group, &source.group) {
            (Some(dest), Some(src)) => dest.name == src.name && dest.put && src.pull,
            _ => false,
        }
    }
}

#[async_trait]
impl LiveHook for SortableHook {
    async fn on_attach(&self) -> Result<()> {
        debug!(
            container = %self.el.id.0,
            group = self.config.group.as_ref().map(|g| g.name.as_str()),
            "sortable mounted"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sortable_tests.rs"]
mod tests;
