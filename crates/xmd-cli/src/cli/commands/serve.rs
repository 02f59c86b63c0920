//! `xmd serve` – JSON-lines message host on stdin/stdout.
//!
//! Each message is handled on its own task, so replies may arrive out of
//! order; a `requestId` on a message is echoed on its reply.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use xmd_core::config::XmdConfig;
use xmd_core::message::MessageHandler;

use super::{build_cascade, download_dir};

pub async fn run_serve(cfg: &XmdConfig) -> Result<()> {
    let cascade = Arc::new(build_cascade(cfg));
    let handler = Arc::new(MessageHandler::new(cfg, cascade, download_dir(cfg, None)?));
    tracing::info!("serving messages on stdin");

    let (replies, mut outbox) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(mut out) = outbox.recv().await {
            out.push('\n');
            stdout.write_all(out.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let handler = Arc::clone(&handler);
        let replies = replies.clone();
        tokio::spawn(async move {
            let envelope = handler.handle_enveloped(&line).await;
            match serde_json::to_string(&envelope) {
                Ok(out) => {
                    let _ = replies.send(out);
                }
                Err(e) => tracing::warn!(error = %e, "reply did not serialize"),
            }
        });
    }
    tracing::info!("stdin closed; waiting for pending replies");

    // The writer stops once every in-flight message task has replied.
    drop(replies);
    writer.await??;
    Ok(())
}
