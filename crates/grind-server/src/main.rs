//! Binary entrypoint for the Grind Stories HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`ServerConfig::from_env`](grind_server::config::ServerConfig::from_env).

use grind_server::config::ServerConfig;
use grind_server::router::build_router;
use grind_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize application state");
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    tracing::info!("grind server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind listener");
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}
