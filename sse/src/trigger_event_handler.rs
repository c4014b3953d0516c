use crate::message::Event as SseEvent;
use crate::Broadcaster;
use async_trait::async_trait;
use events::{EventHandler, TriggerEvent};
use log::*;
use std::sync::Arc;

/// Turns trigger events into `update` frames for every connected client.
pub struct SseTriggerEventHandler {
    broadcaster: Arc<Broadcaster>,
}

impl SseTriggerEventHandler {
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl EventHandler for SseTriggerEventHandler {
    async fn handle(&self, event: &TriggerEvent) {
        match event {
            TriggerEvent::MarkerUpdated {
                marker,
                modified_at,
            } => {
                let report = self.broadcaster.notify(&SseEvent::update_at(*modified_at));
                info!(
                    "Marker {} updated, notified {} client(s)",
                    marker.display(),
                    report.delivered
                );
            }
        }
    }
}
