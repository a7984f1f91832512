//! Restaurant timing repository for SQLite operations

use sqlx::SqliteConnection;

use crate::data::sqlite::SqliteError;
use crate::data::types::NewTiming;

pub async fn insert_timings(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    timings: &[NewTiming],
) -> Result<(), SqliteError> {
    for timing in timings {
        sqlx::query(
            "INSERT INTO restaurant_timings (restaurant_id, day, opens, closes) VALUES (?, ?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(i64::from(timing.day))
        .bind(i64::from(timing.opens))
        .bind(i64::from(timing.closes))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
