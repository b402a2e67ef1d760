//! HTTP route handlers.

use std::sync::Arc;

use axum::middleware;
use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assignment::{DeveloperDirectory, SharedDeveloperDirectory};
use crate::config::Config;
use crate::model::{ModelGateway, PredictorRef};
use crate::session::SessionRegistry;
use crate::text::{BundledStopWords, StopWords, TextPreprocessor};

use super::session;
use super::tasks;
use super::types::*;
use super::ui;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Live sessions, each with its own task store
    pub sessions: SessionRegistry,
    /// Compiled page templates
    pub pages: ui::Pages,
}

impl AppState {
    pub fn new(
        config: Config,
        predictor: PredictorRef,
        developers: SharedDeveloperDirectory,
    ) -> anyhow::Result<Self> {
        let sessions = SessionRegistry::new(predictor, developers, config.session_idle_timeout);
        let pages = ui::Pages::new()?;
        Ok(Self {
            config,
            sessions,
            pages,
        })
    }

    /// Prepare text resources, load the models and the developer table.
    pub fn initialize(config: Config) -> anyhow::Result<Self> {
        let stop_words = StopWords::initialize(
            &config.text_data_dir,
            &config.stopword_language,
            &BundledStopWords,
        )?;
        tracing::info!(
            language = %stop_words.language(),
            words = stop_words.len(),
            "Stop words loaded"
        );

        let gateway = ModelGateway::load(&config.model_dir, TextPreprocessor::new(stop_words))?;
        tracing::info!(
            categories = ?gateway.category_labels(),
            priorities = ?gateway.priority_labels(),
            "Model labels"
        );

        let developers = match &config.developer_mapping_path {
            Some(path) => DeveloperDirectory::from_yaml_file(path)?,
            None => DeveloperDirectory::default(),
        };

        Self::new(config, Arc::new(gateway), Arc::new(developers))
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    let session_routes = Router::new()
        .merge(ui::routes())
        .nest("/api", tasks::routes())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            session::attach_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::initialize(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, all session data will be discarded");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.len().await,
    })
}
