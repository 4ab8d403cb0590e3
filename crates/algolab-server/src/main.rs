//! Binary entrypoint for the algolab HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`algolab_server::config`].

use algolab_server::config::ServerConfig;
use algolab_server::router::build_router;
use algolab_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = config.addr();
    let state = AppState::new(config);
    let app = build_router(state);

    tracing::info!("algolab server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", err);
        std::process::exit(1);
    }
}
