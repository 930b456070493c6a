//! pingauthz gateway
//!
//! - `POST /mcp`: MCP JSON-RPC (initialize, tools/list, tools/call)
//! - `POST /api/authorize-decision`: legacy pass-through
//! - `GET /help`, `/schema`, `/healthz`, `/metrics`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use pingauthz_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "pingauthz-gateway stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load()?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "pingauthz-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
