use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ways pushing an event over the live channel can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ChannelError {
    #[error("live channel detached")]
    Detached,
    #[error("failed to encode event params: {0}")]
    Serialization(String),
}
