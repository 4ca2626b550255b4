use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::MaskConfig;
use crate::embed::{Embedder, FastEmbedder};
use crate::error::{MaskError, Result};
use crate::output::ndjson;
use crate::ticket::{BatchRequest, EmbedRequest, EmbedResponse, EmbeddingRecord};

fn load_embedder(config: &MaskConfig) -> Result<Arc<FastEmbedder>> {
    tracing::info!(model = %config.embedding.model, "loading embedding model");
    Ok(Arc::new(FastEmbedder::new(&config.embedding)?))
}

/// Embed `{message}` and print `{embedding}`.
pub async fn run_embed(config: &MaskConfig, input: Option<&Path>) -> Result<()> {
    let request: EmbedRequest = super::read_body(input).await?;
    let embedder = load_embedder(config)?;

    let embedding = tokio::task::spawn_blocking(move || embedder.embed(&request.message))
        .await
        .map_err(|e| MaskError::Embedding {
            reason: e.to_string(),
        })?;

    println!("{}", serde_json::to_string(&EmbedResponse { embedding })?);
    Ok(())
}

/// Embed each `{ticketId, message|messages}` and stream `{ticketId, embedding}` lines.
pub async fn run_embed_batch(config: &MaskConfig, input: Option<&Path>) -> Result<()> {
    let request: BatchRequest = super::read_body(input).await?;
    let embedder = load_embedder(config)?;
    let (tx, rx) = mpsc::channel(ndjson::DEFAULT_CHANNEL_CAPACITY);

    let producer = tokio::task::spawn_blocking(move || {
        for item in request.batches {
            let text = item.embedding_text();
            if text.trim().is_empty() {
                tracing::warn!(
                    ticket_id = %item.ticket_id,
                    "batch item has no text; embedding is null"
                );
            }
            let record = EmbeddingRecord {
                embedding: embedder.embed(&text),
                ticket_id: item.ticket_id,
            };
            if tx.blocking_send(Ok(record)).is_err() {
                break;
            }
        }
    });

    let mut stdout = tokio::io::stdout();
    let summary = ndjson::write_ndjson(rx, &mut stdout).await?;
    ndjson::join_producer(producer).await?;
    tracing::info!(records = summary.records, "embedding batch done");
    Ok(())
}
