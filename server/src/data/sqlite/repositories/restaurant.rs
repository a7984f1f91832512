//! Restaurant repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::push_contains_all;
use crate::data::sqlite::SqliteError;
use crate::data::types::RestaurantRow;

/// Insert a restaurant and return its id
pub async fn insert_restaurant(
    conn: &mut SqliteConnection,
    name: &str,
    cash_balance: f64,
) -> Result<i64, SqliteError> {
    let result = sqlx::query("INSERT INTO restaurants (name, cash_balance) VALUES (?, ?)")
        .bind(name)
        .bind(cash_balance)
        .execute(conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Delete every restaurant; menus, timings and transactions cascade
pub async fn delete_all_restaurants(conn: &mut SqliteConnection) -> Result<u64, SqliteError> {
    let result = sqlx::query("DELETE FROM restaurants").execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn count_restaurants(pool: &SqlitePool) -> Result<i64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Restaurants whose name contains every term (case-insensitive), by id
pub async fn search_by_name(
    pool: &SqlitePool,
    terms: &[&str],
    limit: u32,
) -> Result<Vec<RestaurantRow>, SqliteError> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, cash_balance FROM restaurants WHERE 1 = 1");
    push_contains_all(&mut builder, "name", terms);
    builder.push(" ORDER BY id LIMIT ").push_bind(i64::from(limit));

    let rows = builder
        .build_query_as::<RestaurantRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
