mod config;
mod game;
mod models;
mod routes;
mod utils;
mod websocket;

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use config::Config;
use dashmap::DashMap;
use game::GameSession;
use tokio::sync::mpsc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use websocket::messages::ServerMessage;

/// How often idle sessions are swept
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// A live session plus the sockets watching it
#[derive(Debug)]
pub struct ActiveGame {
    pub session: GameSession,
    /// Connected clients keyed by connection id
    pub subscribers: HashMap<Uuid, mpsc::Sender<ServerMessage>>,
    pub created_at: DateTime<Utc>,
    pub last_activity: Instant,
}

impl ActiveGame {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            subscribers: HashMap::new(),
            created_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn subscriber_list(&self) -> Vec<mpsc::Sender<ServerMessage>> {
        self.subscribers.values().cloned().collect()
    }

    /// Nobody is watching and nothing has happened for `idle`
    pub fn is_stale(&self, now: Instant, idle: Duration) -> bool {
        self.subscribers.is_empty() && now.duration_since(self.last_activity) > idle
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub active_games: DashMap<Uuid, ActiveGame>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fox_tiles_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FOX tiles backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded: {}x{} board, target word {}",
        config.game.settings.width,
        config.game.settings.height,
        config.game.settings.target
    );

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        active_games: DashMap::new(),
    });

    // Spawn background task to drop sessions nobody is using
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        session_cleanup_task(cleanup_state).await;
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically evicts idle, unwatched sessions
async fn session_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);

    loop {
        interval.tick().await;
        evict_stale_games(&state, Instant::now());
    }
}

fn evict_stale_games(state: &AppState, now: Instant) -> usize {
    let idle = state.config.game.session_idle;
    let stale: Vec<Uuid> = state
        .active_games
        .iter()
        .filter(|entry| entry.value().is_stale(now, idle))
        .map(|entry| *entry.key())
        .collect();

    for game_id in &stale {
        if state.active_games.remove(game_id).is_some() {
            tracing::info!("Removed idle game {} (no subscribers)", game_id);
        }
    }

    stale.len()
}
