//! Text search over restaurant names and dish names

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use utoipa::ToSchema;

use super::restaurants::ResponseShape;
use crate::core::constants::{MAX_SEARCH_TERMS, SEARCH_RESULT_LIMIT};
use crate::data::DataError;
use crate::data::sqlite::repositories::{search_by_dish_name, search_by_name};
use crate::data::types::{MenuItemRow, RestaurantRow};
use crate::utils::sql::split_terms;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search query must contain at least one term.")]
    EmptyQuery,

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DataError),
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub restaurants: Vec<RestaurantRow>,
    pub dishes: Vec<MenuItemRow>,
}

/// Dish as returned by search
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DishSummary {
    pub id: i64,
    pub dish_name: String,
    pub price: f64,
    pub restaurant_id: i64,
}

impl ResponseShape<MenuItemRow> for DishSummary {
    fn from_entity(row: &MenuItemRow) -> Self {
        Self {
            id: row.id,
            dish_name: row.dish_name.clone(),
            price: row.price,
            restaurant_id: row.restaurant_id,
        }
    }
}

/// Find restaurants and dishes whose names contain every term of `query`
pub async fn search(pool: &SqlitePool, query: &str) -> Result<SearchResults, SearchError> {
    let terms = split_terms(query, MAX_SEARCH_TERMS);
    if terms.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let (restaurants, dishes) = tokio::try_join!(
        search_by_name(pool, &terms, SEARCH_RESULT_LIMIT),
        search_by_dish_name(pool, &terms, SEARCH_RESULT_LIMIT),
    )
    .map_err(DataError::from)?;

    tracing::debug!(
        terms = terms.len(),
        restaurants = restaurants.len(),
        dishes = dishes.len(),
        "Search completed"
    );
    Ok(SearchResults {
        restaurants,
        dishes,
    })
}
