//! Lewis Structure Builder Server
//!
//! Serves the canvas pages and keeps one piece store per browser session
//! and canvas, rebuilt from the notifications each canvas sends.
//!
//! ## Protocol
//!
//! Each notification is one JSON object, sent as a WebSocket text frame on
//! `/ws?session=<id>&canvas=<name>` or POSTed to
//! `/api/sessions/<id>/canvases/<name>/notify`:
//! ```json
//! { "id": "piece-3f2a", "x": 120, "y": 80, "deleted": false, "label": "C", "type": "atom" }
//! { "id": "piece-3f2a", "x": null, "y": null, "deleted": true }
//! ```

mod config;
mod routes;
mod sessions;

use config::{SCRIPT_NAME, ServerConfig};
use sessions::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lewis_server=info,lewis_core=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let canvases = config.load_canvases()?;
    info!("Loaded {} canvases", canvases.len());

    let state = Arc::new(AppState::new(canvases, format!("/pkg/{}", SCRIPT_NAME)));
    tokio::spawn(sessions::run_eviction(state.clone(), config.session_ttl));
    let app = routes::router(state, &config.pkg_dir);

    info!("Lewis structure builder listening on {}", config.bind);
    info!("Serving browser binding from {}", config.pkg_dir.display());
    info!("Idle sessions expire after {}s", config.session_ttl.as_secs());

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
