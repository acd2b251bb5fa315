//! Pomodoro Timer - A local countdown service for focus sessions and breaks
//!
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_timer::{
    api::create_router,
    config::Config,
    cue::CompletionCue,
    state::AppState,
    tasks::countdown_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, auto_start={}, sound={:?}",
          config.host, config.port, config.auto_start, config.sound);

    // Create application state
    let cue = CompletionCue::new(config.tone_sink());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.auto_start, cue));

    // Start the countdown ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start or resume the countdown");
    info!("  POST /pause          - Pause the countdown");
    info!("  POST /reset          - Reset the current mode");
    info!("  POST /skip           - Skip to the next mode");
    info!("  POST /modes/:mode_id - Switch to focus, shortBreak or longBreak");
    info!("  POST /chime          - Play the completion chime");
    info!("  GET  /modes          - List modes");
    info!("  GET  /modes/:mode_id - Describe one mode");
    info!("  GET  /status         - Current countdown");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
