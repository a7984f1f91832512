//! Restaurant listing endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, STATUS_SUCCESS, validate_limit};
use crate::data::SqliteService;
use crate::domain::restaurants::{
    Entities, FilterError, RawFilterParams, RestaurantFilter, RestaurantSummary, project,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct RestaurantsApiState {
    pub database: Arc<SqliteService>,
}

pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    Router::new()
        .route("/", get(list_restaurants))
        .with_state(RestaurantsApiState { database })
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RestaurantQuery {
    /// Repeatable; empty means the default filter
    #[serde(default)]
    pub filter: Vec<String>,
    /// Unix seconds
    pub open_at: Option<i64>,
    pub price_lower: Option<f64>,
    pub price_upper: Option<f64>,
    pub ndish_gt: Option<i64>,
    pub ndish_lt: Option<i64>,
    #[validate(custom(function = "validate_limit"))]
    pub limit: Option<i64>,
}

impl RestaurantQuery {
    fn raw_params(&self) -> RawFilterParams {
        RawFilterParams {
            open_at: self.open_at.map(Into::into),
            price_lower: self.price_lower,
            price_upper: self.price_upper,
            ndish_gt: self.ndish_gt,
            ndish_lt: self.ndish_lt,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantListResponse {
    pub status: &'static str,
    #[schema(value_type = Vec<RestaurantSummary>)]
    pub restaurants: Value,
}

// ============================================================================
// Handlers
// ============================================================================

/// List restaurants matching a set of filters
#[utoipa::path(
    get,
    path = "/api/restaurant",
    tag = "restaurants",
    params(
        ("filter" = Option<Vec<String>>, Query, description = "Filter names (open_at, price, ndish); repeat for several"),
        ("open_at" = Option<i64>, Query, description = "Instant to test opening hours at (unix seconds, default now)"),
        ("price_lower" = Option<f64>, Query, description = "Minimum dish price (inclusive)"),
        ("price_upper" = Option<f64>, Query, description = "Maximum dish price (inclusive)"),
        ("ndish_gt" = Option<i64>, Query, description = "More than this many dishes"),
        ("ndish_lt" = Option<i64>, Query, description = "Fewer than this many dishes"),
        ("limit" = Option<i64>, Query, description = "Maximum restaurants returned (1-500)")
    ),
    responses(
        (status = 200, description = "Matching restaurants ordered by id", body = RestaurantListResponse),
        (status = 422, description = "Invalid filter set or parameters")
    )
)]
pub async fn list_restaurants(
    State(state): State<RestaurantsApiState>,
    ValidatedQuery(query): ValidatedQuery<RestaurantQuery>,
) -> Result<Json<RestaurantListResponse>, ApiError> {
    if !RestaurantFilter::validate_filters(&query.filter) {
        return Err(FilterError::InvalidFilterSet.into());
    }

    let filter = RestaurantFilter::new(&query.filter, query.raw_params())?;
    let rows = filter
        .get_filtered_restaurants(state.database.pool())
        .await?;
    let restaurants = project::<RestaurantSummary, _>(Entities::Many(&rows))?;

    Ok(Json(RestaurantListResponse {
        status: STATUS_SUCCESS,
        restaurants,
    }))
}
