//! Menu item repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::push_contains_all;
use crate::data::sqlite::SqliteError;
use crate::data::types::{MenuItemRow, NewMenuItem};

/// Insert the menu of one restaurant, returning ids in input order
pub async fn insert_menu_items(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    items: &[NewMenuItem],
) -> Result<Vec<i64>, SqliteError> {
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let result = sqlx::query(
            "INSERT INTO menu_items (restaurant_id, dish_name, price) VALUES (?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(&item.dish_name)
        .bind(item.price)
        .execute(&mut *conn)
        .await?;
        ids.push(result.last_insert_rowid());
    }
    Ok(ids)
}

/// Menu items whose dish name contains every term (case-insensitive), by id
pub async fn search_by_dish_name(
    pool: &SqlitePool,
    terms: &[&str],
    limit: u32,
) -> Result<Vec<MenuItemRow>, SqliteError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, restaurant_id, dish_name, price FROM menu_items WHERE 1 = 1",
    );
    push_contains_all(&mut builder, "dish_name", terms);
    builder.push(" ORDER BY id LIMIT ").push_bind(i64::from(limit));

    let rows = builder
        .build_query_as::<MenuItemRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
