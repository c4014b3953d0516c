use crate::message::Event;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::UnboundedSender;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered streaming client.
///
/// The sender feeds the connection's response stream; the handler that
/// accepted the connection owns the receiving half and, through it, the
/// socket. Two `Client`s are the same client when their ids match.
#[derive(Debug, Clone)]
pub struct Client {
    id: ConnectionId,
    sender: UnboundedSender<Event>,
}

impl Client {
    pub fn new(id: ConnectionId, sender: UnboundedSender<Event>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queues an event for this client. Fails once the client's stream is gone.
    pub fn send(&self, event: Event) -> Result<(), SendError<Event>> {
        self.sender.send(event)
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Client {}

impl Hash for Client {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Lets the registry look clients up by id alone.
impl Borrow<ConnectionId> for Client {
    fn borrow(&self) -> &ConnectionId {
        &self.id
    }
}

/// The set of clients currently believed to be writable.
///
/// Every operation takes the lock only for the set operation itself; callers
/// iterate over a [`snapshot`](Self::snapshot) so the lock is never held while
/// events are delivered.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<HashSet<Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashSet::new()),
        }
    }

    /// Adds a client. Returns `false` (and changes nothing) if it is already present.
    pub fn register(&self, client: Client) -> bool {
        self.lock().insert(client)
    }

    /// Removes a client. Returns `false` if it was not registered.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        self.lock().remove(connection_id)
    }

    /// Point-in-time copy of the membership.
    pub fn snapshot(&self) -> Vec<Client> {
        self.lock().iter().cloned().collect()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.lock().contains(connection_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a HashSet half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<Client>> {
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
