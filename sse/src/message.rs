use axum::response::sse::Event as SseEvent;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Events pushed to connected clients.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Sent once, as the very first frame of every connection.
    Hello,
    /// New content is available; `timestamp` is the marker mtime in Unix seconds.
    Update { timestamp: f64 },
}

impl Event {
    pub fn update_at(modified_at: SystemTime) -> Self {
        Event::Update {
            timestamp: unix_timestamp(modified_at),
        }
    }

    /// The `data:` payload of the frame.
    pub fn data(&self) -> String {
        match self {
            Event::Hello => "connected".to_string(),
            Event::Update { timestamp } => format!("{timestamp:.6}"),
        }
    }

    /// Renders the event as `event: <type>\ndata: <payload>\n\n`.
    pub fn to_sse_event(&self) -> SseEvent {
        // event must be set before data to keep the field order on the wire
        SseEvent::default()
            .event(self.event_type())
            .data(self.data())
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Hello => "hello",
            Event::Update { .. } => "update",
        }
    }
}

/// Seconds since the Unix epoch, negative for times before it.
pub fn unix_timestamp(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}
