//! Request and response shapes for the masking and embedding surfaces.
//!
//! Missing or `null` fields fall back to empty values instead of failing the
//! whole request.

use serde::{Deserialize, Deserializer, Serialize};

/// A ticket: an id and its ordered messages, alive for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub ticket_id: String,
    pub messages: Vec<String>,
}

impl Ticket {
    /// Build a ticket, dropping empty and whitespace-only messages.
    pub fn new(ticket_id: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            messages: messages
                .into_iter()
                .filter(|m| !m.trim().is_empty())
                .collect(),
        }
    }
}

/// Body of a single mask request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaskRequest {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskResponse {
    pub masked_messages: Vec<String>,
}

/// Body of a batch request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default, deserialize_with = "lenient_items")]
    pub batches: Vec<BatchItem>,
}

/// One batch entry: either a single `message` or a list of `messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "ticketId", default, deserialize_with = "lenient_id")]
    pub ticket_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub messages: Vec<String>,
}

impl BatchItem {
    /// The item's messages as a ticket. `messages` wins over `message`.
    pub fn into_ticket(self) -> Ticket {
        let messages = if self.messages.is_empty() {
            vec![self.message]
        } else {
            self.messages
        };
        Ticket::new(self.ticket_id, messages)
    }

    /// Text to embed: `message`, or the non-blank `messages` joined by spaces
    /// when `message` is blank.
    pub fn embedding_text(&self) -> String {
        if !self.message.trim().is_empty() {
            return self.message.clone();
        }
        self.messages
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Body of a single embedding request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbedRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Option<Vec<f32>>,
}

/// One NDJSON line of batch embedding output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
    pub embedding: Option<Vec<f32>>,
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<Option<String>>>::deserialize(d)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

fn lenient_items<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<BatchItem>, D::Error> {
    let raw = Option::<Vec<Option<BatchItem>>>::deserialize(d)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<RawId>::deserialize(d)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
