//! Restaurant and dish search endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, MAX_SEARCH_QUERY_LENGTH, STATUS_SUCCESS};
use crate::data::SqliteService;
use crate::domain::restaurants::{Entities, RestaurantSummary, project};
use crate::domain::search::{self, DishSummary};

#[derive(Clone)]
pub struct SearchApiState {
    pub database: Arc<SqliteService>,
}

pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    Router::new()
        .route("/", get(search_all))
        .with_state(SearchApiState { database })
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = MAX_SEARCH_QUERY_LENGTH))]
    pub s: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub status: &'static str,
    #[schema(value_type = Vec<RestaurantSummary>)]
    pub restaurants: Value,
    #[schema(value_type = Vec<DishSummary>)]
    pub dishes: Value,
}

/// Search restaurant names and dish names
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(
        ("s" = String, Query, description = "Whitespace-separated terms; every term must match")
    ),
    responses(
        (status = 200, description = "Matching restaurants and dishes", body = SearchResponse),
        (status = 422, description = "Empty or overlong query")
    )
)]
pub async fn search_all(
    State(state): State<SearchApiState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = search::search(state.database.pool(), &query.s).await?;

    Ok(Json(SearchResponse {
        status: STATUS_SUCCESS,
        restaurants: project::<RestaurantSummary, _>(Entities::Many(&results.restaurants))?,
        dishes: project::<DishSummary, _>(Entities::Many(&results.dishes))?,
    }))
}
