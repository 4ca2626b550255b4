use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::Result;

use super::{ChunkObserver, ChunkSplit, SizeWarning, TicketRecord, TracingObserver};

/// Keeps batch output records under a byte ceiling.
///
/// Size is the length of the compact JSON encoding that is actually emitted.
/// Up to `warn_bytes` a record passes untouched; up to `split_bytes` it passes
/// with a size warning; beyond that its messages are split into groups of at
/// most `max_messages`, each tagged `<ticketId>_chunk_<n>`.
pub struct ResponseChunker {
    warn_bytes: usize,
    split_bytes: usize,
    max_messages: usize,
    observer: Arc<dyn ChunkObserver>,
}

impl ResponseChunker {
    pub fn new(config: &ChunkingConfig, observer: Arc<dyn ChunkObserver>) -> Self {
        Self {
            warn_bytes: config.warn_bytes,
            split_bytes: config.split_bytes,
            max_messages: config.max_messages.max(1),
            observer,
        }
    }

    /// Chunker with default limits reporting through `tracing`.
    pub fn with_defaults() -> Self {
        Self::new(&ChunkingConfig::default(), Arc::new(TracingObserver))
    }

    pub fn chunk(&self, record: TicketRecord) -> Result<Vec<TicketRecord>> {
        let byte_size = serde_json::to_vec(&record)?.len();

        if byte_size <= self.warn_bytes {
            return Ok(vec![record]);
        }

        if byte_size <= self.split_bytes || record.masked_messages.is_empty() {
            self.observer.size_warning(&SizeWarning {
                ticket_id: record.ticket_id.clone(),
                byte_size,
                message_count: record.masked_messages.len(),
                total_chars: record
                    .masked_messages
                    .iter()
                    .map(|m| m.chars().count())
                    .sum(),
            });
            return Ok(vec![record]);
        }

        let chunks: Vec<TicketRecord> = record
            .masked_messages
            .chunks(self.max_messages)
            .enumerate()
            .map(|(index, slice)| TicketRecord {
                ticket_id: format!("{}_chunk_{}", record.ticket_id, index),
                masked_messages: slice.to_vec(),
            })
            .collect();

        self.observer.chunk_split(&ChunkSplit {
            ticket_id: record.ticket_id,
            byte_size,
            message_count: record.masked_messages.len(),
            chunk_count: chunks.len(),
        });
        Ok(chunks)
    }
}
