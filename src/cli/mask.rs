use std::path::Path;
use std::sync::Arc;

use crate::config::MaskConfig;
use crate::error::Result;
use crate::mask::MaskingPipeline;
use crate::output::chunker::ResponseChunker;
use crate::output::ndjson::{self, StreamSummary};
use crate::output::TracingObserver;
use crate::recognizer;
use crate::ticket::{BatchRequest, MaskRequest, MaskResponse, Ticket};

fn build_pipeline(config: &MaskConfig) -> Result<MaskingPipeline> {
    let recognizer = recognizer::from_config(&config.recognizer)?;
    MaskingPipeline::from_config(config, recognizer)
}

/// Mask `{messages}` and print `{masked_messages}`.
pub async fn run_mask(config: &MaskConfig, input: Option<&Path>) -> Result<()> {
    let request: MaskRequest = super::read_body(input).await?;
    let pipeline = build_pipeline(config)?;

    let messages = Ticket::new("", request.messages).messages;
    let masked_messages: Vec<String> = pipeline
        .mask_batch(&messages)
        .await?
        .into_iter()
        .filter(|m| !m.trim().is_empty())
        .collect();

    println!("{}", serde_json::to_string(&MaskResponse { masked_messages })?);
    Ok(())
}

/// Mask `{batches}` and stream one NDJSON record per ticket or chunk.
pub async fn run_mask_batch(config: &MaskConfig, input: Option<&Path>) -> Result<StreamSummary> {
    let request: BatchRequest = super::read_body(input).await?;
    let pipeline = Arc::new(build_pipeline(config)?);
    let chunker = Arc::new(ResponseChunker::new(
        &config.chunking,
        Arc::new(TracingObserver),
    ));

    let tickets: Vec<Ticket> = request
        .batches
        .into_iter()
        .map(|item| item.into_ticket())
        .collect();
    tracing::info!(tickets = tickets.len(), "masking batch");

    let stream = ndjson::stream_tickets(
        pipeline,
        chunker,
        tickets,
        ndjson::DEFAULT_CHANNEL_CAPACITY,
    );
    let mut stdout = tokio::io::stdout();
    let summary = stream.write_to(&mut stdout).await?;

    if !summary.failed_tickets.is_empty() {
        eprintln!(
            "ticket-mask: {} ticket(s) failed: {}",
            summary.failed_tickets.len(),
            summary.failed_tickets.join(", ")
        );
    }
    Ok(summary)
}
