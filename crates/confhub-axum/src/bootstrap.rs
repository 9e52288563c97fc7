//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use confhub_core::{ChangeNotifier, ConfigService, InMemoryParameterRepository, ParameterRepository};
use confhub_db::{CoreFactory, setup_database};

use crate::notifier::BroadcastNotifier;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5025;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/confhub.db";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Path to the `SQLite` database file.
    pub database_path: PathBuf,
    /// Keep parameters in memory instead of `SQLite`.
    pub in_memory: bool,
    /// Events buffered per SSE subscriber before it starts lagging.
    pub event_capacity: usize,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default values.
    pub fn with_defaults() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            in_memory: false,
            event_capacity: 256,
            cors: CorsConfig::default(),
        }
    }

    /// Use the in-memory store.
    #[must_use]
    pub fn with_in_memory_store(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The configuration service.
    pub config: Arc<ConfigService>,
    /// Broadcast notifier, shared with the service, feeding the SSE stream.
    pub notifier: Arc<BroadcastNotifier>,
}

/// Bootstrap the configuration service and its collaborators.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let notifier = Arc::new(BroadcastNotifier::new(config.event_capacity));
    let change_notifier: Arc<dyn ChangeNotifier> = notifier.clone();

    let repo: Arc<dyn ParameterRepository> = if config.in_memory {
        tracing::warn!(
            target: "confhub.storage",
            "Using in-memory parameter store; data is lost on shutdown"
        );
        Arc::new(InMemoryParameterRepository::new())
    } else {
        let pool = setup_database(&config.database_path).await?;
        tracing::info!(
            target: "confhub.storage",
            database_path = %config.database_path.display(),
            "Using SQLite parameter store"
        );
        CoreFactory::parameter_repository(pool)
    };

    Ok(AxumContext {
        config: Arc::new(ConfigService::new(repo, change_notifier)),
        notifier,
    })
}

/// Start the Axum server and serve until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("confhub listening on http://{}", addr);

    serve_until(listener, ctx, config.cors, shutdown_signal()).await
}

/// Serve on `listener` until `signal` resolves, then shut down gracefully.
///
/// Open event streams are ended first, so in-flight requests drain and the
/// server returns even while SSE clients are connected.
pub async fn serve_until<F>(
    listener: TcpListener,
    ctx: AxumContext,
    cors: CorsConfig,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let notifier = ctx.notifier.clone();
    let app = crate::routes::create_router(ctx, &cors);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notifier.shutdown();
        })
        .await?;

    info!("confhub stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use confhub_core::Scope;

    #[tokio::test]
    async fn test_bootstrap_in_memory() {
        let ctx = bootstrap(&ServerConfig::with_defaults().with_in_memory_store())
            .await
            .unwrap();
        let mut events = ctx.notifier.receiver();

        ctx.config.update(&Scope::user("u1"), "k", "v").await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.user_id, "u1");
    }

    #[tokio::test]
    async fn test_bootstrap_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            database_path: dir.path().join("confhub.db"),
            ..ServerConfig::with_defaults()
        };

        let ctx = bootstrap(&config).await.unwrap();
        ctx.config.update(&Scope::app("u1", "a"), "k", "v").await.unwrap();
        assert!(config.database_path.exists());
    }
}
