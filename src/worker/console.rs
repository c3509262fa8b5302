use crate::worker::stats::ProcessingStats;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Info,
    Waiting,
    Processing,
    Success,
    Warning,
    Error,
    Stats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsoleEvent {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

/// Live progress feed for the worker dashboard. Every milestone is mirrored
/// to tracing and fanned out over a broadcast channel to any connected
/// console client; with no subscribers the send result is just ignored.
#[derive(Clone)]
pub struct ConsoleStream {
    tx: broadcast::Sender<ConsoleEvent>,
}

impl ConsoleStream {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, kind: EventKind, message: impl Into<String>) {
        let message = message.into();

        match kind {
            EventKind::Error => error!("[console] {}", message),
            EventKind::Warning => warn!("[console] {}", message),
            _ => info!("[console] {}", message),
        }

        let _ = self.tx.send(ConsoleEvent {
            message,
            kind,
            timestamp: Utc::now(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.tx.subscribe()
    }
}

/// `GET /console/stream`: server-sent events feed of console milestones.
pub async fn stream(console: web::Data<ConsoleStream>) -> HttpResponse {
    let rx = console.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(_) => continue,
                    };
                    let chunk = web::Bytes::from(format!("data: {}\n\n", payload));
                    return Some((Ok::<_, actix_web::Error>(chunk), rx));
                }
                // A lagging console client just misses old events.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .insert_header(("content-type", "text/event-stream"))
        .insert_header(("cache-control", "no-cache"))
        .streaming(events)
}

/// `GET /console/stats`: current success/failure counters.
pub async fn stats(stats: web::Data<ProcessingStats>) -> HttpResponse {
    HttpResponse::Ok().json(stats.snapshot())
}

/// `GET /healthz`
pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_events_reach_subscribers() {
        let console = ConsoleStream::new(8);
        let mut rx = console.subscribe();

        console.emit(EventKind::Processing, "working");

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Processing);
        assert_eq!(event.message, "working");
    }

    #[test]
    fn event_serializes_with_lowercase_type_tag() {
        let event = ConsoleEvent {
            message: "done".to_string(),
            kind: EventKind::Success,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["message"], "done");
    }
}
