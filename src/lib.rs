//! Redaction of personal and business-sensitive data from support messages,
//! with size-bounded NDJSON output for ticket batches.

pub mod cli;
pub mod config;
pub mod embed;
pub mod error;
pub mod mask;
pub mod output;
pub mod recognizer;
pub mod ticket;

pub use error::{MaskError, Result};
pub use mask::MaskingPipeline;
pub use output::chunker::ResponseChunker;
pub use output::TicketRecord;
pub use recognizer::{Entity, EntityRecognizer};
pub use ticket::Ticket;
