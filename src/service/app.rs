//! Main application state and service coordination
//!
//! This module contains the production AppState that builds the score store,
//! the rating engine and metrics, and runs the HTTP server task.

use crate::config::AppConfig;
use crate::engine::RatingEngine;
use crate::metrics::MetricsCollector;
use crate::service::http;
use crate::store::{InMemoryScoreStore, JsonFileStore, ScoreStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store initialization error: {message}")]
    Store { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Shared handles given to every request handler
#[derive(Clone)]
pub struct ServiceContext {
    config: Arc<AppConfig>,
    engine: Arc<RatingEngine>,
    metrics_collector: Arc<MetricsCollector>,
    is_running: Arc<RwLock<bool>>,
}

impl ServiceContext {
    /// Build a context over `store`
    pub fn new(config: AppConfig, store: Arc<dyn ScoreStore>) -> Result<Self, ServiceError> {
        let metrics_collector = MetricsCollector::new().map_err(|e| ServiceError::Initialization {
            message: format!("Failed to create metrics collector: {}", e),
        })?;
        let metrics_collector = Arc::new(metrics_collector);
        let engine = Arc::new(RatingEngine::with_metrics(store, metrics_collector.clone()));

        Ok(Self {
            config: Arc::new(config),
            engine,
            metrics_collector,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> Arc<RatingEngine> {
        self.engine.clone()
    }

    pub fn store(&self) -> Arc<dyn ScoreStore> {
        self.engine.store()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    /// Check if the service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Mark the service as running or stopped
    pub async fn set_running(&self, running: bool) {
        *self.is_running.write().await = running;
    }
}

/// Main application state containing all service components
pub struct AppState {
    context: ServiceContext,

    /// Background task handles
    background_tasks: Vec<JoinHandle<()>>,

    /// Signals the HTTP server to stop
    shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Initialize the application, building the store described by the config
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing game-night service");

        let store = Self::initialize_store(&config)?;
        Self::with_store(config, store)
    }

    /// Initialize the application over an existing store
    pub fn with_store(config: AppConfig, store: Arc<dyn ScoreStore>) -> Result<Self, ServiceError> {
        let context = ServiceContext::new(config, store)?;
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            context,
            background_tasks: Vec::new(),
            shutdown_tx,
        })
    }

    /// Shared handles used by request handlers and health checks
    pub fn context(&self) -> ServiceContext {
        self.context.clone()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        self.context.config()
    }

    /// Check if the service is running
    pub async fn is_running(&self) -> bool {
        self.context.is_running().await
    }

    /// Bind the configured address and start serving
    pub async fn start(&mut self) -> Result<(), ServiceError> {
        let addr = self.context.config().http_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::Initialization {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        self.start_with_listener(listener).await
    }

    /// Start serving on an already bound listener
    pub async fn start_with_listener(&mut self, listener: TcpListener) -> Result<(), ServiceError> {
        info!("Starting game-night service");

        let local_addr = listener
            .local_addr()
            .map_err(|e| ServiceError::Initialization {
                message: format!("Failed to read listener address: {}", e),
            })?;

        self.context.set_running(true).await;

        let app = http::router(self.context.clone());
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let server_task = tokio::spawn(async move {
            info!("HTTP server listening on http://{}", local_addr);
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                    info!("HTTP server shutdown signal received");
                })
                .await;

            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
            info!("HTTP server stopped");
        });
        self.background_tasks.push(server_task);

        info!("✅ Game-night service started successfully");
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&mut self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of game-night service");

        self.context.set_running(false).await;

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }

        for task in self.background_tasks.drain(..) {
            if let Err(e) = task.await {
                return Err(ServiceError::BackgroundTask {
                    message: format!("HTTP server task failed: {}", e),
                });
            }
        }

        info!("✅ Graceful shutdown completed");
        Ok(())
    }

    fn initialize_store(config: &AppConfig) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        match &config.store.data_file {
            Some(path) => {
                info!("Using JSON file store at {}", path.display());
                let store = JsonFileStore::open(path.clone(), config.store.pretty).map_err(|e| {
                    ServiceError::Store {
                        message: format!("{:#}", e),
                    }
                })?;
                Ok(Arc::new(store))
            }
            None => {
                warn!("No data file configured, scores will be lost on restart");
                Ok(Arc::new(InMemoryScoreStore::new()))
            }
        }
    }
}
