//! Health check endpoint
//!
//! Reports the build version and the schema version of the attached
//! database. A database that cannot be read turns the check into a 503.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::SqliteService;

#[derive(Clone)]
pub struct HealthApiState {
    pub database: Arc<SqliteService>,
}

pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthApiState { database })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `unavailable` when the database cannot be read
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i32>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database cannot be read", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthApiState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.schema_version().await {
        Ok(schema_version) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
                schema_version: Some(schema_version),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version: env!("CARGO_PKG_VERSION"),
                    schema_version: None,
                }),
            )
        }
    }
}
