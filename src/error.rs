use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("entity recognizer failed: {reason}")]
    Recognizer { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("embedding error: {reason}")]
    Embedding { reason: String },

    #[error("api error: status={status}, body={body}")]
    Api { status: u16, body: String },

    #[error("stream producer failed: {reason}")]
    Stream { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ticket {ticket_id} failed: {source}")]
    Ticket {
        ticket_id: String,
        #[source]
        source: Box<MaskError>,
    },
}

impl MaskError {
    /// Wrap a failure so it stays attributed to the ticket that caused it.
    pub fn for_ticket(ticket_id: impl Into<String>, source: MaskError) -> Self {
        Self::Ticket {
            ticket_id: ticket_id.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, MaskError>;
