//! SQLite repositories
//!
//! Row types (RestaurantRow, MenuItemRow, ...) live in `crate::data::types`.
//! Writes take a `SqliteConnection` so the seed import can run them inside
//! one transaction; reads take the pool.

pub mod menu_item;
pub mod restaurant;
pub mod timing;
pub mod user;

use sqlx::{QueryBuilder, Sqlite};

use crate::utils::sql::contains_pattern;

pub use menu_item::{insert_menu_items, search_by_dish_name};
pub use restaurant::{count_restaurants, delete_all_restaurants, insert_restaurant, search_by_name};
pub use timing::insert_timings;
pub use user::{count_transactions, delete_all_users, insert_transaction, insert_user};

/// Append `AND <column> LIKE ? ESCAPE '\'` for every term
fn push_contains_all(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, terms: &[&str]) {
    for term in terms {
        builder
            .push(" AND ")
            .push(column)
            .push(" LIKE ")
            .push_bind(contains_pattern(term))
            .push(" ESCAPE '\\'");
    }
}
