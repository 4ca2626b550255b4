pub mod chunker;
pub mod ndjson;

use serde::{Deserialize, Serialize};

/// One line of batch masking output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
    #[serde(rename = "maskedMessages")]
    pub masked_messages: Vec<String>,
}

/// A record that is large but still emitted whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeWarning {
    pub ticket_id: String,
    pub byte_size: usize,
    pub message_count: usize,
    pub total_chars: usize,
}

/// A record that was split into chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSplit {
    pub ticket_id: String,
    pub byte_size: usize,
    pub message_count: usize,
    pub chunk_count: usize,
}

/// Receives size notices keyed by ticket id.
pub trait ChunkObserver: Send + Sync {
    fn size_warning(&self, warning: &SizeWarning);
    fn chunk_split(&self, split: &ChunkSplit);
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ChunkObserver for TracingObserver {
    fn size_warning(&self, warning: &SizeWarning) {
        tracing::warn!(
            ticket_id = %warning.ticket_id,
            byte_size = warning.byte_size,
            message_count = warning.message_count,
            total_chars = warning.total_chars,
            "large masked record"
        );
    }

    fn chunk_split(&self, split: &ChunkSplit) {
        tracing::info!(
            ticket_id = %split.ticket_id,
            byte_size = split.byte_size,
            message_count = split.message_count,
            chunk_count = split.chunk_count,
            "masked record split into chunks"
        );
    }
}
