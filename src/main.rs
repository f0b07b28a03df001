mod card;
mod config;
mod error;
mod export;
mod routes;
mod websocket;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use config::Config;
use dashmap::DashMap;
use export::CardExporter;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Bookkeeping for an open card session. The card itself lives in the
/// session's socket task.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub connected_at: DateTime<Utc>,
    /// Client messages handled so far
    pub actions: u64,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self {
            connected_at: Utc::now(),
            actions: 0,
        }
    }

    pub fn record_action(&mut self) {
        self.actions += 1;
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub exporter: Box<dyn CardExporter>,
    /// Open card sessions keyed by session id
    pub sessions: DashMap<Uuid, SessionInfo>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let exporter = Box::new(config.exporter());
        Self {
            config,
            exporter,
            sessions: DashMap::new(),
        }
    }
}

/// Router with the WebSocket endpoint and API routes, without static files
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket::handle_websocket))
        .merge(routes::create_routes())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bingo_card=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting bingo card server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded (default card {}x{}, color {})",
        config.card.default_size.get(),
        config.card.default_size.get(),
        config.card.default_color
    );

    let addr = config.server_addr();
    let frontend_service = ServeDir::new(&config.server.frontend_dir);

    let state = Arc::new(AppState::new(config));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state)
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Card editor: http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
