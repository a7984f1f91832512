//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::{health, restaurants, search};
use crate::core::config::ServerConfig;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::core::shutdown::ShutdownService;
use crate::data::SqliteService;

/// Build the full application router
pub fn router(database: Arc<SqliteService>, allowed_origins: &AllowedOrigins) -> Router {
    Router::new()
        .merge(health::routes(database.clone()))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/restaurant", restaurants::routes(database.clone()))
        .nest("/api/search", search::routes(database))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

pub struct ApiServer {
    config: ServerConfig,
    database: Arc<SqliteService>,
    shutdown: ShutdownService,
}

impl ApiServer {
    pub fn new(config: ServerConfig, database: Arc<SqliteService>, shutdown: ShutdownService) -> Self {
        Self {
            config,
            database,
            shutdown,
        }
    }

    /// Serve until the shutdown signal fires
    pub async fn start(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .host
                .parse()
                .with_context(|| format!("Invalid host address: {}", self.config.host))?,
            self.config.port,
        );

        let allowed_origins = AllowedOrigins::new(&self.config.host, self.config.port);
        let router = router(self.database, &allowed_origins);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(%addr, "API server listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(self.shutdown.wait())
        .await?;

        tracing::debug!("API server stopped");
        Ok(())
    }
}
