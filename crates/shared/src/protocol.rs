use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Dataset, ElementId};

/// One outbound event on the live channel, addressed to a specific element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    pub target: ElementId,
    pub event: String,
    pub params: Map<String, Value>,
}

/// Events pushed by the server that hooks subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerEvent {
    OptionSelected {
        #[serde(rename = "isCorrect")]
        is_correct: bool,
    },
}

impl ServerEvent {
    /// Wire name of the event as the server pushes it.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::OptionSelected { .. } => "option-selected",
        }
    }

    /// Decodes a named event and its payload; unknown names yield `None`.
    pub fn from_wire(event: &str, payload: &Value) -> Option<Self> {
        match event {
            "option-selected" => Some(ServerEvent::OptionSelected {
                is_correct: payload.get("isCorrect")?.as_bool()?,
            }),
            _ => None,
        }
    }
}

/// Payload of a finished reorder gesture: destination container attributes,
/// then moved-item attributes (item wins on collision), then the index pair.
/// The indices go in last so a stray `old`/`new` data attribute can never
/// shadow them.
pub fn reposition_params(
    old_index: usize,
    new_index: usize,
    container: &Dataset,
    item: &Dataset,
) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in container.iter() {
        params.insert(key.clone(), Value::String(value.clone()));
    }
    for (key, value) in item.iter() {
        params.insert(key.clone(), Value::String(value.clone()));
    }
    params.insert("old".to_string(), Value::from(old_index as u64));
    params.insert("new".to_string(), Value::from(new_index as u64));
    params
}
