//! Countdown - A keypad-driven countdown timer engine
//! 
//! This is the main entry point for the countdown server.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::tick_driver_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms", 
          config.host, config.port, config.tick_interval);

    // Ticks from the scheduler flow through this channel into the engine
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        tick_tx,
    ));

    // Start the tick driver background task
    let driver_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(driver_state, tick_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /input/:digit - Press a keypad digit (0-9)");
    info!("  POST /backspace    - Remove the last digit");
    info!("  POST /reset        - Clear the countdown");
    info!("  POST /toggle       - Start, pause or resume");
    info!("  GET  /status       - Current countdown and metadata");
    info!("  GET  /events       - Server-sent snapshot stream");
    info!("  GET  /health       - Health check");

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
