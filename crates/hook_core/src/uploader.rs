use std::{convert::Infallible, sync::Arc};

use futures::Stream;
use reqwest::{header::CONTENT_LENGTH, Body, Client};
use tokio::{
    sync::broadcast,
    task::{AbortHandle, JoinHandle},
};
use tracing::{info, warn};
use url::Url;

use shared::domain::{EntryId, TransferState};

use crate::error::TransferError;

/// Header asserting same-origin credential semantics on the pre-signed PUT.
const CREDENTIALS_HEADER: &str = "credentials";
const CREDENTIALS_HEADER_VALUE: &str = "same-origin parameter";

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// One file transfer: the pre-signed destination and the raw bytes to send.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub entry_id: EntryId,
    pub url: Url,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { entry_id: EntryId, percent: u8 },
    Succeeded { entry_id: EntryId },
    Failed { entry_id: EntryId, error: TransferError },
}

impl UploadEvent {
    pub fn entry_id(&self) -> EntryId {
        match self {
            UploadEvent::Progress { entry_id, .. }
            | UploadEvent::Succeeded { entry_id }
            | UploadEvent::Failed { entry_id, .. } => *entry_id,
        }
    }

    pub fn state(&self) -> TransferState {
        match self {
            UploadEvent::Progress { .. } => TransferState::Pending,
            UploadEvent::Succeeded { .. } => TransferState::Success,
            UploadEvent::Failed { .. } => TransferState::Failed,
        }
    }
}

/// Uploads files straight to S3-compatible storage over pre-signed URLs.
///
/// Every entry is a single PUT with no retry, chunking protocol, or timeout;
/// a failed attempt is final. Progress and terminal outcomes are broadcast as
/// [`UploadEvent`]s tagged with the entry id.
pub struct DirectUploadClient {
    http: Client,
    events: broadcast::Sender<UploadEvent>,
}

impl DirectUploadClient {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(1024);
        Arc::new(Self {
            http: Client::new(),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// Starts every entry's transfer as its own task; entries run
    /// concurrently and complete in no particular order. `on_view_error`
    /// receives each entry's abort handle as its transfer starts, so the
    /// caller can cancel on view teardown. An aborted transfer emits no
    /// further events.
    pub fn start_batch(
        self: &Arc<Self>,
        entries: Vec<UploadEntry>,
        mut on_view_error: impl FnMut(AbortHandle),
    ) -> Vec<JoinHandle<()>> {
        entries
            .into_iter()
            .map(|entry| {
                let client = Arc::clone(self);
                let handle = tokio::spawn(async move { client.transfer(entry).await });
                on_view_error(handle.abort_handle());
                handle
            })
            .collect()
    }

    async fn transfer(&self, entry: UploadEntry) {
        let entry_id = entry.entry_id;
        let total = entry.payload.len() as u64;
        info!(
            entry_id = entry_id.0,
            total_bytes = total,
            url = %entry.url,
            "starting direct upload"
        );

        let body = progress_body(entry.payload, entry_id, self.events.clone());
        let result = self
            .http
            .put(entry.url)
            .header(CREDENTIALS_HEADER, CREDENTIALS_HEADER_VALUE)
            .header(CONTENT_LENGTH, total)
            .body(Body::wrap_stream(body))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(entry_id = entry_id.0, "upload complete");
                let _ = self.events.send(UploadEvent::Progress {
                    entry_id,
                    percent: 100,
                });
                let _ = self.events.send(UploadEvent::Succeeded { entry_id });
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(entry_id = entry_id.0, status, "upload rejected");
                let _ = self.events.send(UploadEvent::Failed {
                    entry_id,
                    error: TransferError::Status(status),
                });
            }
            Err(err) => {
                warn!(entry_id = entry_id.0, error = %err, "upload transport failure");
                let _ = self.events.send(UploadEvent::Failed {
                    entry_id,
                    error: TransferError::Transport(err.to_string()),
                });
            }
        }
    }
}

/// Request body that reports percentage progress as chunks are handed to the
/// transport. Progress only ever strictly increases and stays below 100; the
/// terminal 100 is reported on the success path alone, so a fully-streamed
/// body that then fails never looks complete.
fn progress_body(
    payload: Vec<u8>,
    entry_id: EntryId,
    events: broadcast::Sender<UploadEvent>,
) -> impl Stream<Item = Result<Vec<u8>, Infallible>> + Send {
    struct Window {
        payload: Vec<u8>,
        offset: usize,
        sent: u64,
        last_percent: u8,
    }

    let total = payload.len() as u64;
    let window = Window {
        payload,
        offset: 0,
        sent: 0,
        last_percent: 0,
    };

    futures::stream::unfold(window, move |mut window| {
        let events = events.clone();
        async move {
            if window.offset >= window.payload.len() {
                return None;
            }
            let end = (window.offset + UPLOAD_CHUNK_SIZE).min(window.payload.len());
            let chunk = window.payload[window.offset..end].to_vec();
            window.offset = end;
            window.sent += chunk.len() as u64;

            let percent = (window.sent * 100 / total) as u8;
            if percent < 100 && percent > window.last_percent {
                window.last_percent = percent;
                let _ = events.send(UploadEvent::Progress { entry_id, percent });
            }
            Some((Ok(chunk), window))
        }
    })
}

#[cfg(test)]
#[path = "tests/uploader_tests.rs"]
mod tests;
