//! Event system infrastructure for the GOES live-update service.
//!
//! This crate decouples the producer of change notifications (the trigger
//! watcher) from the infrastructure that reacts to them (SSE fan-out).
//!
//! # Architecture
//!
//! - **TriggerEvent**: Enum representing all changes the service can detect
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on other internal crates.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// Events emitted when the watched filesystem state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// The marker file's modification time moved past the highest value seen so far.
    /// Emitted at most once per strict increase.
    MarkerUpdated {
        /// Path of the marker that changed.
        marker: PathBuf,
        /// The marker's new modification time.
        modified_at: SystemTime,
    },
}

/// Trait for handling trigger events.
/// Implementations can perform side effects like pushing notifications
/// to connected clients, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &TriggerEvent);
}

/// Publishes trigger events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers, one after another.
    pub async fn publish(&self, event: TriggerEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
