//! Per-session piece stores.

use dashmap::DashMap;
use lewis_core::render::{PageContext, Tab, render_canvas_page};
use lewis_core::{ApplyOutcome, CanvasConfig, PieceStore};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often idle stores are looked for.
const EVICTION_PERIOD: Duration = Duration::from_secs(60);

/// Identifies one canvas instance in one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub session: String,
    pub canvas: String,
}

impl SessionKey {
    pub fn new(session: impl Into<String>, canvas: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            canvas: canvas.into(),
        }
    }
}

/// A session's store, its open sockets, and when it was last used.
struct Session {
    store: PieceStore,
    connections: usize,
    last_touched: Instant,
}

/// Shared application state
pub struct AppState {
    /// Configured canvases in tab order.
    canvases: Vec<CanvasConfig>,
    /// One independent store per session and canvas.
    sessions: DashMap<SessionKey, Session>,
    /// URL of the browser binding module.
    script_url: String,
}

impl AppState {
    pub fn new(canvases: Vec<CanvasConfig>, script_url: impl Into<String>) -> Self {
        Self {
            canvases,
            sessions: DashMap::new(),
            script_url: script_url.into(),
        }
    }

    pub fn canvas(&self, name: &str) -> Option<&CanvasConfig> {
        self.canvases.iter().find(|c| c.name == name)
    }

    /// The first configured canvas.
    pub fn default_canvas(&self) -> Option<&CanvasConfig> {
        self.canvases.first()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Run `f` on the store for `key`, creating it (seeded with the
    /// canvas's pre-placed pieces) on first use. `None` for unknown canvases.
    pub fn with_store<R>(&self, key: &SessionKey, f: impl FnOnce(&mut PieceStore) -> R) -> Option<R> {
        self.with_session(key, |session| f(&mut session.store))
    }

    /// Record an open socket. Connected sessions are never evicted.
    pub fn connect(&self, key: &SessionKey) -> bool {
        self.with_session(key, |session| session.connections += 1).is_some()
    }

    /// Record a closed socket.
    pub fn disconnect(&self, key: &SessionKey) {
        if let Some(mut session) = self.sessions.get_mut(key) {
            session.connections = session.connections.saturating_sub(1);
            session.last_touched = Instant::now();
        }
    }

    /// Run `f` on the store for `key` without creating one. Sessions that
    /// never sent a notification read as the canvas's seeded state.
    pub fn read_store<R>(&self, key: &SessionKey, f: impl FnOnce(&PieceStore) -> R) -> Option<R> {
        let config = self.canvas(&key.canvas)?;
        match self.sessions.get(key) {
            Some(session) => Some(f(&session.store)),
            None => Some(f(&PieceStore::seeded(config))),
        }
    }

    /// Apply one raw notification. Malformed payloads are dropped.
    pub fn ingest(&self, key: &SessionKey, payload: &str) -> Option<ApplyOutcome> {
        let outcome = self.with_store(key, |store| store.ingest(payload)).flatten();
        match outcome {
            Some(outcome) => tracing::debug!(
                session = %key.session,
                canvas = %key.canvas,
                ?outcome,
                "Applied notification"
            ),
            None => tracing::warn!(
                session = %key.session,
                canvas = %key.canvas,
                "Ignored notification"
            ),
        }
        outcome
    }

    fn with_session<R>(&self, key: &SessionKey, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let config = self.canvas(&key.canvas)?;
        let mut session = self.sessions.entry(key.clone()).or_insert_with(|| Session {
            store: PieceStore::seeded(config),
            connections: 0,
            last_touched: Instant::now(),
        });
        session.last_touched = Instant::now();
        Some(f(&mut *session))
    }

    /// Debug dump of a session's canvas.
    pub fn dump(&self, key: &SessionKey) -> Option<serde_json::Value> {
        self.read_store(key, |store| store.dump())
    }

    /// Render the page for a session's canvas.
    pub fn render_page(&self, key: &SessionKey) -> Option<String> {
        let config = self.canvas(&key.canvas)?;
        let tabs: Vec<Tab<'_>> = self
            .canvases
            .iter()
            .map(|c| Tab {
                name: &c.name,
                title: &c.title,
            })
            .collect();
        self.read_store(key, |store| {
            render_canvas_page(&PageContext {
                config,
                tabs: &tabs,
                store,
                session: &key.session,
                script_url: &self.script_url,
            })
        })
    }

    /// Drop stores that have not been touched for `max_idle` as of `now`.
    /// Returns how many were removed.
    pub fn evict_idle(&self, now: Instant, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.connections > 0 || now.saturating_duration_since(session.last_touched) < max_idle
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}

/// Evict stores idle for longer than `ttl`, forever.
pub async fn run_eviction(state: Arc<AppState>, ttl: Duration) {
    let mut ticker = tokio::time::interval(EVICTION_PERIOD);
    loop {
        ticker.tick().await;
        state.evict_idle(Instant::now(), ttl);
    }
}
