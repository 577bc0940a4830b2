use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures::{future, FutureExt};
use hook_core::{DirectUploadClient, UploadEntry, UploadEvent};
use shared::domain::EntryId;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;

/// Uploads a local file straight to a pre-signed destination, reporting
/// progress the way the live uploader does.
#[derive(Parser, Debug)]
struct Args {
    /// Pre-signed destination URL; falls back to the configured default.
    #[arg(long)]
    url: Option<String>,
    /// File to upload.
    #[arg(long)]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();
    let args = Args::parse();

    let url = args
        .url
        .or(settings.upload_url)
        .context("no destination: pass --url or configure upload_url")?;
    let url: Url = url.parse().context("invalid destination url")?;
    let payload = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    info!(bytes = payload.len(), file = %args.file.display(), "queued upload");

    let client = DirectUploadClient::new();
    let mut events = BroadcastStream::new(client.subscribe_events());

    let mut aborts = Vec::new();
    let handles = client.start_batch(
        vec![UploadEntry {
            entry_id: EntryId(0),
            url,
            payload,
        }],
        |abort| aborts.push(abort),
    );

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; aborting transfer");
            for abort in &aborts {
                abort.abort();
            }
        }
    });

    let mut transfers = future::join_all(handles);
    loop {
        tokio::select! {
            biased;
            event = events.next() => match event {
                Some(Ok(event)) => log_event(&event),
                _ => break,
            },
            _ = &mut transfers => break,
        }
    }
    // Transfers may finish between polls; report whatever is still buffered.
    while let Some(Some(Ok(event))) = events.next().now_or_never() {
        log_event(&event);
    }

    Ok(())
}

fn log_event(event: &UploadEvent) {
    match event {
        UploadEvent::Progress { percent, .. } => info!(percent = *percent, "upload progress"),
        UploadEvent::Succeeded { .. } => info!("upload complete"),
        UploadEvent::Failed { error, .. } => warn!(%error, "upload failed"),
    }
}
