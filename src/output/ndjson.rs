use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{MaskError, Result};
use crate::mask::MaskingPipeline;
use crate::ticket::Ticket;

use super::chunker::ResponseChunker;
use super::TicketRecord;

/// Media type of the batch output.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Default number of records buffered between producer and writer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Records from a running producer task, plus the task itself.
pub struct TicketStream {
    pub records: mpsc::Receiver<Result<TicketRecord>>,
    producer: JoinHandle<()>,
}

impl TicketStream {
    /// Write every record as NDJSON, then make sure the producer finished
    /// cleanly. A panicked producer is an error even if the channel drained.
    pub async fn write_to<W>(self, writer: &mut W) -> Result<StreamSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let summary = write_ndjson(self.records, writer).await?;
        join_producer(self.producer).await?;
        Ok(summary)
    }
}

/// Await a producer task, mapping a panic or cancellation to `MaskError::Stream`.
pub async fn join_producer(producer: JoinHandle<()>) -> Result<()> {
    producer.await.map_err(|e| MaskError::Stream {
        reason: e.to_string(),
    })
}

/// Mask and chunk tickets one at a time on a spawned task.
///
/// Records arrive in ticket order, then chunk order. A ticket that fails to
/// mask yields a single `MaskError::Ticket` in place of its records and the
/// producer moves on to the next ticket.
pub fn stream_tickets(
    pipeline: Arc<MaskingPipeline>,
    chunker: Arc<ResponseChunker>,
    tickets: Vec<Ticket>,
    capacity: usize,
) -> TicketStream {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    let producer = tokio::spawn(async move {
        for ticket in tickets {
            let ticket_id = ticket.ticket_id.clone();
            match mask_ticket(&pipeline, &chunker, ticket).await {
                Ok(records) => {
                    for record in records {
                        if tx.send(Ok(record)).await.is_err() {
                            tracing::debug!("ndjson consumer went away; stopping producer");
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(ticket_id = %ticket_id, error = %e, "ticket masking failed");
                    if tx.send(Err(MaskError::for_ticket(ticket_id, e))).await.is_err() {
                        return;
                    }
                }
            }
        }
    });

    TicketStream {
        records: rx,
        producer,
    }
}

async fn mask_ticket(
    pipeline: &MaskingPipeline,
    chunker: &ResponseChunker,
    ticket: Ticket,
) -> Result<Vec<TicketRecord>> {
    let masked_messages = pipeline.mask_batch(&ticket.messages).await?;
    chunker.chunk(TicketRecord {
        ticket_id: ticket.ticket_id,
        masked_messages,
    })
}

/// Summary of a finished NDJSON stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub records: usize,
    pub failed_tickets: Vec<String>,
}

/// Write every record as one JSON line, flushing after each so a reader sees
/// complete records as soon as they exist. Ticket failures are collected, not
/// written.
pub async fn write_ndjson<W, T>(
    mut rx: mpsc::Receiver<Result<T>>,
    writer: &mut W,
) -> Result<StreamSummary>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let mut summary = StreamSummary::default();
    while let Some(item) = rx.recv().await {
        match item {
            Ok(record) => {
                let mut line = serde_json::to_vec(&record)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
                summary.records += 1;
            }
            Err(MaskError::Ticket { ticket_id, .. }) => summary.failed_tickets.push(ticket_id),
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}
