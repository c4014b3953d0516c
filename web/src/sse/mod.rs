//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the `/events` endpoint.
//! The core SSE infrastructure (Broadcaster, ClientRegistry, Event types)
//! lives in the `sse` crate so the trigger side can use it without the web layer.

pub mod handler;
