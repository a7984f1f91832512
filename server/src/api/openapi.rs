//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, restaurants, search};
use crate::domain::restaurants::RestaurantSummary;
use crate::domain::search::DishSummary;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Frenzy API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Restaurant discovery"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "restaurants", description = "Filtered restaurant listing"),
        (name = "search", description = "Restaurant and dish search")
    ),
    paths(
        health::health,
        restaurants::list_restaurants,
        search::search_all,
    ),
    components(schemas(
        health::HealthResponse,
        restaurants::RestaurantListResponse,
        search::SearchResponse,
        RestaurantSummary,
        DishSummary,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
