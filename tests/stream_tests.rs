//! Tests for streaming NDJSON emission of ticket batches.

use std::sync::Arc;

use async_trait::async_trait;
use ticket_mask::config::MaskConfig;
use ticket_mask::output::ndjson::stream_tickets;
use ticket_mask::recognizer::{Entity, EntityRecognizer};
use ticket_mask::{MaskError, MaskingPipeline, ResponseChunker, Ticket};

/// Marks "Alice" as a person; fails the whole call on "BOOM" and panics on
/// "PANIC".
struct AliceRecognizer;

#[async_trait]
impl EntityRecognizer for AliceRecognizer {
    async fn recognize(&self, texts: &[String]) -> ticket_mask::Result<Vec<Vec<Entity>>> {
        texts
            .iter()
            .map(|t| {
                if t.contains("PANIC") {
                    panic!("recognizer crashed");
                }
                if t.contains("BOOM") {
                    return Err(MaskError::Recognizer {
                        reason: "boom".into(),
                    });
                }
                Ok(t.find("Alice")
                    .map(|b| {
                        let start = t[..b].chars().count();
                        vec![Entity::new(start, start + 5, "PERSON")]
                    })
                    .unwrap_or_default())
            })
            .collect()
    }

    fn name(&self) -> &str {
        "alice"
    }
}

fn parts() -> (Arc<MaskingPipeline>, Arc<ResponseChunker>) {
    let pipeline =
        MaskingPipeline::from_config(&MaskConfig::default(), Arc::new(AliceRecognizer)).unwrap();
    (Arc::new(pipeline), Arc::new(ResponseChunker::with_defaults()))
}

#[tokio::test]
async fn records_arrive_in_ticket_order() {
    let (pipeline, chunker) = parts();
    let tickets = vec![
        Ticket::new("A", vec!["<p>hi Alice</p>".into(), "mail x@y.com".into()]),
        Ticket::new("B", vec!["second ticket".into()]),
    ];

    let mut out: Vec<u8> = Vec::new();
    let summary = stream_tickets(pipeline, chunker, tickets, 1)
        .write_to(&mut out)
        .await
        .unwrap();

    assert_eq!(summary.records, 2);
    assert!(summary.failed_tickets.is_empty());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"ticketId\":\"A\",\"maskedMessages\":[\"hi\",\"mail\"]}\n\
         {\"ticketId\":\"B\",\"maskedMessages\":[\"second ticket\"]}\n"
    );
}

#[tokio::test]
async fn failing_ticket_is_isolated() {
    let (pipeline, chunker) = parts();
    let tickets = vec![
        Ticket::new("ok-1", vec!["fine".into()]),
        Ticket::new("bad", vec!["Alice".into(), "BOOM".into()]),
        Ticket::new("ok-2", vec!["also fine".into()]),
    ];

    let mut stream = stream_tickets(pipeline, chunker, tickets, 4);
    let mut seen = Vec::new();
    while let Some(item) = stream.records.recv().await {
        match item {
            Ok(record) => seen.push(format!("ok:{}", record.ticket_id)),
            Err(MaskError::Ticket { ticket_id, source }) => {
                assert!(matches!(*source, MaskError::Recognizer { .. }));
                seen.push(format!("err:{ticket_id}"));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(seen, vec!["ok:ok-1", "err:bad", "ok:ok-2"]);
}

#[tokio::test]
async fn panicked_producer_is_reported() {
    let (pipeline, chunker) = parts();
    let tickets = vec![
        Ticket::new("first", vec!["fine".into()]),
        Ticket::new("second", vec!["PANIC".into()]),
        Ticket::new("third", vec!["never reached".into()]),
    ];

    let mut out: Vec<u8> = Vec::new();
    let err = stream_tickets(pipeline, chunker, tickets, 4)
        .write_to(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MaskError::Stream { .. }), "got {err}");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"ticketId\":\"first\",\"maskedMessages\":[\"fine\"]}\n"
    );
}

#[tokio::test]
async fn large_ticket_streams_chunks() {
    let (pipeline, chunker) = parts();
    let message = "word ".repeat(1_000);
    let tickets = vec![Ticket::new("big", vec![message; 120])];

    let mut out: Vec<u8> = Vec::new();
    let summary = stream_tickets(pipeline, chunker, tickets, 1)
        .write_to(&mut out)
        .await
        .unwrap();

    assert_eq!(summary.records, 3);
    let text = String::from_utf8(out).unwrap();
    let ids: Vec<String> = text
        .lines()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            v["ticketId"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids, vec!["big_chunk_0", "big_chunk_1", "big_chunk_2"]);
}

#[tokio::test]
async fn empty_batch_writes_nothing() {
    let (pipeline, chunker) = parts();
    let mut out: Vec<u8> = Vec::new();
    let summary = stream_tickets(pipeline, chunker, Vec::new(), 1)
        .write_to(&mut out)
        .await
        .unwrap();
    assert_eq!(summary.records, 0);
    assert!(out.is_empty());
}
