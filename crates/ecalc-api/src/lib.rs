//! Enterprise Calculator API /v1: REST endpoints over the calculator and
//! its trace buffer
pub mod handlers;
pub mod metrics;
pub mod middleware;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use ecalc_core::{RunConfig, TraceEmitter};
use ecalc_pipelines::{Calculator, RecordingPlayer};

use crate::metrics::ApiMetrics;

/// State shared by every handler.
///
/// The calculator sits behind an async mutex so at most one pipeline run
/// is in flight. The emitter is held separately: draining the trace must
/// not wait for a running pipeline.
pub struct AppState {
    pub calculator: Mutex<Calculator>,
    pub emitter: Arc<TraceEmitter>,
    pub player: Arc<RecordingPlayer>,
    pub metrics: ApiMetrics,
    /// Largest encoding `/v1/codecs` will build for a sample
    pub max_symbols: u64,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: RunConfig) -> Result<Self, prometheus::Error> {
        let player = Arc::new(RecordingPlayer::new());
        let calculator = Calculator::with_player(config, player.clone());
        Ok(Self {
            emitter: calculator.emitter(),
            max_symbols: calculator.config().max_steps,
            calculator: Mutex::new(calculator),
            player,
            metrics: ApiMetrics::new()?,
        })
    }
}

pub fn create_app(state: SharedState) -> Router {
    Router::new()
        .route("/v1/operate", post(handlers::operate))
        .route("/v1/trace", get(handlers::drain_trace))
        .route("/v1/trace/peek", get(handlers::peek_trace))
        .route("/v1/codecs", get(handlers::list_codecs))
        .route("/v1/notes", get(handlers::notes))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(addr: &str, config: RunConfig) -> anyhow::Result<()> {
    tracing::info!(profile = %config.name, max_steps = config.max_steps, "loading calculator");
    let state = Arc::new(AppState::new(config).context("registering metrics")?);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("ecalc API listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
