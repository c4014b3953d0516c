use log::*;
use service::config::Config;
use ::sse::Broadcaster;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod error;
pub(crate) mod router;
pub(crate) mod sse;

pub use error::{Error, Result};

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(config: Config, broadcaster: &Arc<Broadcaster>) -> Self {
        Self {
            config,
            broadcaster: Arc::clone(broadcaster),
        }
    }
}

/// Binds the configured address and serves the `/events` stream until the
/// process ends. Each accepted connection runs on its own task.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let address = app_state.config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| Error::bind(address.clone(), e))?;

    info!("Server starting... listening for connections on http://{address}");

    axum::serve(listener, router::define_routes(app_state))
        .await
        .map_err(Error::serve)
}
