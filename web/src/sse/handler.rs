use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::http::header;
use axum::response::sse::{KeepAlive, Sse};
use axum::response::IntoResponse;
use log::*;
use sse::connection::ConnectionId;
use sse::message::Event;
use sse::Broadcaster;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream; charset=utf-8";

/// Unregisters its connection when dropped.
///
/// Owned by the response stream, so it runs however the stream ends: the
/// peer closing the socket, a write error, or the task being torn down.
struct ConnectionGuard {
    broadcaster: Arc<Broadcaster>,
    connection_id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "SSE connection {} closed, cleaning up",
            self.connection_id.as_str()
        );
        self.broadcaster.unregister_connection(&self.connection_id);
    }
}

/// SSE handler that establishes a long-lived connection for live updates.
/// The first event on every stream is `hello`; `update` events follow as the
/// trigger marker changes.
pub(crate) async fn sse_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Queued before registration so no broadcast can overtake it. The receiver
    // is still in scope, so this send cannot fail.
    let _ = tx.send(Event::Hello);

    let connection_id = app_state.broadcaster.register_connection(tx);
    let guard = ConnectionGuard {
        broadcaster: Arc::clone(&app_state.broadcaster),
        connection_id,
    };

    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield Ok::<_, Infallible>(event.to_sse_event());
        }
    };

    // keep_alive wraps the stream type, so each branch becomes a response here
    let sse = match app_state.config.sse_keep_alive() {
        Some(interval) => Sse::new(stream)
            .keep_alive(KeepAlive::new().interval(interval))
            .into_response(),
        None => Sse::new(stream).into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        sse,
    )
}
