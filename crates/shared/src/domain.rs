use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EntryId);

/// Address of an element managed by the host runtime, e.g. `lesson-list`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// The `data-*` attributes of an element, keyed without the `data-` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset(pub BTreeMap<String, String>);

impl Dataset {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An element as handed to a hook at attach time: its address plus the
/// attribute surface the hook reads its configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub dataset: Dataset,
}

impl Element {
    pub fn new(id: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            id: ElementId::new(id),
            dataset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Pending,
    Success,
    Failed,
}

impl TransferState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TransferState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Info,
    Error,
}

impl FlashKind {
    /// Parses the `data-kind` attribute value. Unknown kinds yield `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "info" => Some(FlashKind::Info),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Info => "info",
            FlashKind::Error => "error",
        }
    }
}
