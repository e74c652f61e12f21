//! Application startup and lifecycle management.
//!
//! Opens the article store once, wires it into the router and runs the HTTP
//! server until a shutdown signal arrives, then closes the store.

use crate::config::{ArticleConfig, StoreBackend};
use crate::handlers;
use crate::services::{ArticleStore, InMemoryArticleStore, MongoArticleStore};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ArticleConfig,
    pub store: Arc<dyn ArticleStore>,
}

impl AppState {
    pub fn new(config: ArticleConfig, store: Arc<dyn ArticleStore>) -> Self {
        Self { config, store }
    }
}

/// Open the store selected by configuration.
pub async fn connect_store(config: &ArticleConfig) -> Result<Arc<dyn ArticleStore>, AppError> {
    match config.store.backend {
        StoreBackend::MongoDb => {
            let store = MongoArticleStore::connect(&config.mongodb)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = match &config.store.seed_path {
                Some(path) => InMemoryArticleStore::from_seed_file(path).await?,
                None => {
                    tracing::warn!("In-memory article store started without seed data");
                    InMemoryArticleStore::new()
                }
            };
            Ok(Arc::new(store))
        }
    }
}

/// Build the HTTP router: article routes (optionally under a prefix) plus
/// the operational endpoints at the root.
pub fn build_router(state: AppState) -> Router {
    let articles = Router::new()
        .route("/articles", get(handlers::list_articles))
        .route("/article", get(handlers::missing_article_id))
        .route("/article/", get(handlers::missing_article_id))
        .route("/article/:id", get(handlers::get_article));

    let api = match state.config.path_prefix() {
        Some(prefix) => Router::new().nest(&prefix, articles),
        None => articles,
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(api)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect the configured store and bind the listener.
    pub async fn build(config: ArticleConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Bind the listener around an already opened store.
    pub async fn build_with_store(
        config: ArticleConfig,
        store: Arc<dyn ArticleStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, store),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn ArticleStore> {
        self.state.store.clone()
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then close the store.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let store = self.state.store.clone();
        let app = build_router(self.state);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        store.shutdown().await;
        tracing::info!("Article store closed");

        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
