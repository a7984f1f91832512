//! User and purchase history repository for SQLite operations

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::NewUserTransaction;

/// Insert a user and return its row id
pub async fn insert_user(
    conn: &mut SqliteConnection,
    external_id: i64,
    name: &str,
    cash_balance: f64,
) -> Result<i64, SqliteError> {
    let result =
        sqlx::query("INSERT INTO users (external_id, name, cash_balance) VALUES (?, ?, ?)")
            .bind(external_id)
            .bind(name)
            .bind(cash_balance)
            .execute(conn)
            .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    tx: &NewUserTransaction,
) -> Result<i64, SqliteError> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_transactions
            (user_id, restaurant_id, menu_item_id, transaction_amount, transaction_date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.restaurant_id)
    .bind(tx.menu_item_id)
    .bind(tx.transaction_amount)
    .bind(tx.transaction_date)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Delete every user; purchase history cascades
pub async fn delete_all_users(conn: &mut SqliteConnection) -> Result<u64, SqliteError> {
    let result = sqlx::query("DELETE FROM users").execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn count_transactions(pool: &SqlitePool) -> Result<i64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_transactions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
