use events::EventPublisher;
use log::{error, info};
use service::{config::Config, logging::Logger};
use sse::trigger_event_handler::SseTriggerEventHandler;
use sse::Broadcaster;
use std::sync::Arc;
use trigger::MarkerWatcher;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting GOES live-update service...");

    let broadcaster = Arc::new(Broadcaster::new());

    let publisher = EventPublisher::new().with_handler(Arc::new(SseTriggerEventHandler::new(
        Arc::clone(&broadcaster),
    )));

    // Runs until the process exits
    let _watcher = MarkerWatcher::new(
        config.trigger_path(),
        config.poll_interval(),
        publisher,
    )
    .spawn();

    let app_state = web::AppState::new(config, &broadcaster);

    if let Err(e) = web::init_server(app_state).await {
        error!("{e}");
        std::process::exit(1);
    }
}
