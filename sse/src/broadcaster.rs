use crate::connection::{Client, ClientRegistry, ConnectionId};
use crate::message::{Event, EventType};
use log::*;
use tokio::sync::mpsc::UnboundedSender;

/// Outcome of a single [`Broadcaster::notify`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Clients the event was handed to.
    pub delivered: usize,
    /// Clients whose stream was gone and that were dropped from the registry.
    pub pruned: usize,
}

/// Fans events out to every connected client.
///
/// One instance is built at start-up and shared by the HTTP layer (which
/// registers connections) and the trigger event handler (which notifies).
pub struct Broadcaster {
    registry: ClientRegistry,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            registry: ClientRegistry::new(),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(&self, sender: UnboundedSender<Event>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.registry
            .register(Client::new(connection_id.clone(), sender));
        info!(
            "Registered SSE connection {} ({} connected)",
            connection_id.as_str(),
            self.registry.len()
        );
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if self.registry.unregister(connection_id) {
            info!(
                "Unregistered SSE connection {} ({} connected)",
                connection_id.as_str(),
                self.registry.len()
            );
        }
    }

    /// Delivers `event` to every client in a snapshot of the registry.
    ///
    /// A failed send never stops delivery to the remaining clients; failed
    /// clients are removed once the whole snapshot has been visited.
    pub fn notify(&self, event: &Event) -> BroadcastReport {
        let clients = self.registry.snapshot();
        let mut dead = Vec::new();
        let mut report = BroadcastReport::default();

        for client in &clients {
            match client.send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(
                        "Failed to send {} event to connection {}: {}. Connection will be removed.",
                        event.event_type(),
                        client.id().as_str(),
                        e
                    );
                    dead.push(client.id().clone());
                }
            }
        }

        for connection_id in &dead {
            if self.registry.unregister(connection_id) {
                report.pruned += 1;
            }
        }

        debug!(
            "Broadcast {} event: delivered={}, pruned={}",
            event.event_type(),
            report.delivered,
            report.pruned
        );
        report
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn connect(broadcaster: &Broadcaster) -> (ConnectionId, UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (broadcaster.register_connection(tx), rx)
    }

    fn update(timestamp: f64) -> Event {
        Event::Update { timestamp }
    }

    #[test]
    fn test_notify_with_no_clients() {
        let broadcaster = Broadcaster::new();
        assert_eq!(broadcaster.notify(&update(1.0)), BroadcastReport::default());
    }

    #[test]
    fn test_notify_delivers_to_live_and_prunes_dead_clients() {
        let broadcaster = Broadcaster::new();
        let mut live: Vec<_> = (0..3).map(|_| connect(&broadcaster)).collect();
        let dead: Vec<_> = (0..2).map(|_| connect(&broadcaster)).collect();
        let dead_ids: Vec<_> = dead
            .into_iter()
            .map(|(id, rx)| {
                drop(rx);
                id
            })
            .collect();
        assert_eq!(broadcaster.connection_count(), 5);

        let report = broadcaster.notify(&update(42.0));

        assert_eq!(
            report,
            BroadcastReport {
                delivered: 3,
                pruned: 2
            }
        );
        assert_eq!(broadcaster.connection_count(), 3);
        for id in &dead_ids {
            assert!(!broadcaster.registry.contains(id));
        }
        for (_, rx) in live.iter_mut() {
            assert_eq!(rx.try_recv().unwrap(), update(42.0));
            assert!(rx.try_recv().is_err(), "exactly one frame per broadcast");
        }
    }

    #[test]
    fn test_pruned_client_is_absent_from_later_broadcasts() {
        let broadcaster = Broadcaster::new();
        let (_, rx) = connect(&broadcaster);
        drop(rx);

        assert_eq!(broadcaster.notify(&update(1.0)).pruned, 1);
        assert_eq!(
            broadcaster.notify(&update(2.0)),
            BroadcastReport::default()
        );
    }

    #[test]
    fn test_client_lifecycle_connect_update_disconnect() {
        let broadcaster = Broadcaster::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Event::Hello).unwrap();
        let id = broadcaster.register_connection(tx);

        assert_eq!(rx.try_recv().unwrap(), Event::Hello);
        broadcaster.notify(&update(10.0));
        assert_eq!(rx.try_recv().unwrap(), update(10.0));
        assert!(rx.try_recv().is_err());

        drop(rx);
        let report = broadcaster.notify(&update(11.0));
        assert_eq!(report.delivered, 0);
        assert!(!broadcaster.registry.contains(&id));
    }

    #[test]
    fn test_unregister_connection_is_idempotent() {
        let broadcaster = Broadcaster::new();
        let (id, _rx) = connect(&broadcaster);
        broadcaster.unregister_connection(&id);
        broadcaster.unregister_connection(&id);
        assert_eq!(broadcaster.connection_count(), 0);
    }
}
