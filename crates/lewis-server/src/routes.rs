//! HTTP and WebSocket handlers.

use crate::config::is_url_safe;
use crate::sessions::{AppState, SessionKey};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use futures_util::StreamExt;
use serde::Deserialize;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// Build the application router.
pub fn router(state: Arc<AppState>, pkg_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/canvas/{name}", get(canvas_page))
        .route("/api/sessions/{session}/canvases/{canvas}/notify", post(notify))
        .route("/api/sessions/{session}/canvases/{canvas}/pieces", get(pieces))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub session: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    pub session: String,
    pub canvas: String,
}

/// Redirect to the first canvas.
async fn index(State(state): State<Arc<AppState>>) -> Response {
    match state.default_canvas() {
        Some(canvas) => Redirect::to(&format!("/canvas/{}", canvas.name)).into_response(),
        None => (StatusCode::NOT_FOUND, "No canvases configured").into_response(),
    }
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Canvas page. Requests without a usable session id are redirected to a
/// fresh one.
async fn canvas_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    if state.canvas(&name).is_none() {
        return (StatusCode::NOT_FOUND, format!("Unknown canvas: {}", name)).into_response();
    }
    let session = match query.session {
        Some(session) if is_url_safe(&session) => session,
        _ => {
            let session = Uuid::new_v4().simple().to_string();
            return Redirect::to(&format!("/canvas/{}?session={}", name, session)).into_response();
        }
    };
    match state.render_page(&SessionKey::new(session, name)) {
        Some(page) => Html(page).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Apply one notification. Malformed bodies are ignored; the response is
/// the same either way.
async fn notify(
    State(state): State<Arc<AppState>>,
    Path((session, canvas)): Path<(String, String)>,
    body: String,
) -> StatusCode {
    if !is_url_safe(&session) {
        return StatusCode::BAD_REQUEST;
    }
    let key = SessionKey::new(session, canvas);
    if state.canvas(&key.canvas).is_none() {
        return StatusCode::NOT_FOUND;
    }
    state.ingest(&key, &body);
    StatusCode::NO_CONTENT
}

/// Debug dump of the stored pieces.
async fn pieces(
    State(state): State<Arc<AppState>>,
    Path((session, canvas)): Path<(String, String)>,
) -> Response {
    if !is_url_safe(&session) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match state.dump(&SessionKey::new(session, canvas)) {
        Some(dump) => Json(dump).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// WebSocket upgrade handler
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SocketQuery>,
) -> Response {
    if !is_url_safe(&query.session) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if state.canvas(&query.canvas).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let key = SessionKey::new(query.session, query.canvas);
    ws.on_upgrade(move |socket| handle_socket(socket, state, key))
}

/// Apply notifications from one canvas in arrival order.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, key: SessionKey) {
    state.connect(&key);
    info!(session = %key.session, canvas = %key.canvas, "Canvas connected");

    while let Some(msg) = socket.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                state.ingest(&key, text.as_str());
            }
            Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                Ok(text) => {
                    state.ingest(&key, text);
                }
                Err(_) => warn!(session = %key.session, "Ignoring non-UTF-8 frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {} // Ignore ping/pong
            Err(e) => {
                warn!(session = %key.session, "WebSocket error: {}", e);
                break;
            }
        }
    }

    state.disconnect(&key);
    info!(session = %key.session, canvas = %key.canvas, "Canvas disconnected");
}
