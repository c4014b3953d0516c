//! Server-Sent Events (SSE) infrastructure for live imagery updates.
//!
//! Every connected browser keeps one `/events` stream open and is told when
//! new imagery has been published, so it can reload without polling.
//!
//! # Architecture
//!
//! - **Client registry**: a mutex-guarded set of connections. Broadcasts work
//!   on a snapshot, so the lock is never held while events are delivered.
//! - **Broadcast only**: every event goes to every connected client.
//! - **Ephemeral messages**: a client that connects after an update has
//!   been sent never sees it; it only receives future events.
//!
//! # Message Flow
//!
//! 1. A client opens `/events` and is sent `hello`
//! 2. Its channel sender is registered in the `ClientRegistry`
//! 3. The trigger watcher publishes a `TriggerEvent` when the marker changes
//! 4. `SseTriggerEventHandler` asks the `Broadcaster` to notify everyone
//! 5. Clients whose stream has gone away are pruned during the broadcast
//!
//! # Modules
//!
//! - `connection`: ClientRegistry and type-safe ConnectionId
//! - `broadcaster`: fan-out with pruning of dead clients
//! - `message`: event definitions and their wire rendering
//! - `trigger_event_handler`: bridge from trigger events to broadcasts

pub mod broadcaster;
pub mod connection;
pub mod message;
pub mod trigger_event_handler;

pub use broadcaster::Broadcaster;
