//! Seed download and database load
//!
//! Raw JSON is saved under the data directory before parsing, so a failed
//! load can be inspected. The load itself runs in one transaction and
//! replaces whatever seed data was there before.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use sqlx::{SqliteConnection, SqlitePool};

use super::error::ImportError;
use super::transform::{
    RestaurantRecord, UserRecord, dedup_by_name, parse_opening_hours, parse_transaction_date,
};
use crate::core::config::SeedConfig;
use crate::core::constants::{
    APP_NAME, SEED_FETCH_TIMEOUT_SECS, SEED_RESTAURANTS_FILENAME, SEED_USERS_FILENAME,
};
use crate::core::storage::{AppStorage, DataSubdir};
use crate::data::sqlite::repositories::{
    delete_all_restaurants, delete_all_users, insert_menu_items, insert_restaurant,
    insert_timings, insert_transaction, insert_user,
};
use crate::data::types::NewUserTransaction;
use crate::utils::crypto::sha256_hex_bytes;
use crate::utils::file::write_atomic;

/// Row counts written by one populate run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    pub restaurants: usize,
    pub menu_items: usize,
    pub timings: usize,
    pub users: usize,
    pub transactions: usize,
    pub skipped_transactions: usize,
}

/// Lookups from names in purchase history to row ids
#[derive(Debug, Default)]
struct NameIndex {
    restaurants: HashMap<String, i64>,
    /// First menu item with each dish name, per restaurant
    menu: HashMap<(i64, String), i64>,
    /// First menu item inserted with each dish name in any restaurant
    dishes: HashMap<String, i64>,
}

impl NameIndex {
    /// Dish on the restaurant's own menu, else the first dish of that name
    fn dish(&self, restaurant_id: i64, dish_name: &str) -> Option<i64> {
        self.menu
            .get(&(restaurant_id, dish_name.to_string()))
            .or_else(|| self.dishes.get(dish_name))
            .copied()
    }
}

/// Download seed data and load it into the database
pub async fn populate_from_remote(
    config: &SeedConfig,
    storage: &AppStorage,
    pool: &SqlitePool,
    skip_users: bool,
) -> Result<PopulateSummary, ImportError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SEED_FETCH_TIMEOUT_SECS))
        .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
        .build()?;

    let restaurants_path = storage.subdir_path(DataSubdir::Seed, SEED_RESTAURANTS_FILENAME);
    let raw = fetch_to_file(&client, &config.restaurants_url, &restaurants_path).await?;
    let restaurants: Vec<RestaurantRecord> = parse_json(&raw, "restaurant")?;

    let users = if skip_users {
        None
    } else {
        let users_path = storage.subdir_path(DataSubdir::Seed, SEED_USERS_FILENAME);
        let raw = fetch_to_file(&client, &config.users_url, &users_path).await?;
        Some(parse_json::<Vec<UserRecord>>(&raw, "user")?)
    };

    populate(pool, restaurants, users).await
}

/// GET `url`, save the body to `path` and return it
async fn fetch_to_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<Vec<u8>, ImportError> {
    tracing::info!(url = %url, "Downloading seed data");
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(ImportError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let body = resp.bytes().await?.to_vec();
    write_atomic(path, &body).await?;
    tracing::debug!(
        path = %path.display(),
        bytes = body.len(),
        sha256 = %sha256_hex_bytes(&body),
        "Seed data saved"
    );
    Ok(body)
}

fn parse_json<T: DeserializeOwned>(raw: &[u8], what: &'static str) -> Result<T, ImportError> {
    serde_json::from_slice(raw).map_err(|source| ImportError::Json { what, source })
}

/// Replace all seed data with `restaurants` and, when given, `users`
pub async fn populate(
    pool: &SqlitePool,
    restaurants: Vec<RestaurantRecord>,
    users: Option<Vec<UserRecord>>,
) -> Result<PopulateSummary, ImportError> {
    let mut summary = PopulateSummary::default();
    let mut tx = pool.begin().await?;

    let removed_users = delete_all_users(&mut tx).await?;
    let removed_restaurants = delete_all_restaurants(&mut tx).await?;
    if removed_users + removed_restaurants > 0 {
        tracing::debug!(
            restaurants = removed_restaurants,
            users = removed_users,
            "Cleared previous seed data"
        );
    }

    let index = load_restaurants(&mut tx, restaurants, &mut summary).await?;
    if let Some(users) = users {
        load_users(&mut tx, &index, users, &mut summary).await?;
    }

    tx.commit().await?;
    tracing::info!(?summary, "Seed data loaded");
    Ok(summary)
}

async fn load_restaurants(
    conn: &mut SqliteConnection,
    records: Vec<RestaurantRecord>,
    summary: &mut PopulateSummary,
) -> Result<NameIndex, ImportError> {
    let mut index = NameIndex::default();

    for record in dedup_by_name(records) {
        let timings = parse_opening_hours(&record.opening_hours).inspect_err(|e| {
            tracing::error!(restaurant = %record.restaurant_name, error = %e, "Bad opening hours");
        })?;
        let menu = record.menu_items();

        let id = insert_restaurant(conn, &record.restaurant_name, record.cash_balance).await?;
        let dish_ids = insert_menu_items(conn, id, &menu).await?;
        insert_timings(conn, id, &timings).await?;

        for (item, dish_id) in menu.iter().zip(&dish_ids) {
            index
                .menu
                .entry((id, item.dish_name.clone()))
                .or_insert(*dish_id);
            index
                .dishes
                .entry(item.dish_name.clone())
                .or_insert(*dish_id);
        }
        index.restaurants.insert(record.restaurant_name, id);

        summary.restaurants += 1;
        summary.menu_items += dish_ids.len();
        summary.timings += timings.len();
    }

    Ok(index)
}

async fn load_users(
    conn: &mut SqliteConnection,
    index: &NameIndex,
    records: Vec<UserRecord>,
    summary: &mut PopulateSummary,
) -> Result<(), ImportError> {
    for user in records {
        let user_id = insert_user(conn, user.id, &user.name, user.cash_balance).await?;
        summary.users += 1;

        for purchase in &user.purchase_history {
            let linked = index
                .restaurants
                .get(&purchase.restaurant_name)
                .and_then(|&rid| index.dish(rid, &purchase.dish_name).map(|dish| (rid, dish)));
            let Some((restaurant_id, menu_item_id)) = linked else {
                tracing::warn!(
                    user = user.id,
                    restaurant = %purchase.restaurant_name,
                    dish = %purchase.dish_name,
                    "Skipping purchase with unknown restaurant or dish"
                );
                summary.skipped_transactions += 1;
                continue;
            };

            let tx = NewUserTransaction {
                user_id,
                restaurant_id,
                menu_item_id,
                transaction_amount: purchase.transaction_amount,
                transaction_date: parse_transaction_date(&purchase.transaction_date)?,
            };
            insert_transaction(conn, &tx).await?;
            summary.transactions += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{count_restaurants, count_transactions, search_by_name};
    use crate::data::sqlite::test_pool;
    use crate::data::types::OPENS_BEFORE_MIDNIGHT;

    /// (restaurant name, dish name) of every stored purchase, by id
    async fn purchases(pool: &SqlitePool) -> Vec<(String, String)> {
        sqlx::query_as(
            r#"
            SELECT r.name, m.dish_name
            FROM user_transactions t
            JOIN restaurants r ON r.id = t.restaurant_id
            JOIN menu_items m ON m.id = t.menu_item_id
            ORDER BY t.id
            "#,
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    fn user_buying(purchases: &[(&str, &str)]) -> Vec<UserRecord> {
        let history: Vec<serde_json::Value> = purchases
            .iter()
            .map(|(restaurant, dish)| {
                serde_json::json!({
                    "dishName": dish,
                    "restaurantName": restaurant,
                    "transactionAmount": 1.0,
                    "transactionDate": "02/10/2020 04:09 AM"
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!([{
            "id": 1,
            "name": "Bo",
            "cashBalance": 10.0,
            "purchaseHistory": history
        }]))
        .unwrap()
    }

    fn restaurants() -> Vec<RestaurantRecord> {
        serde_json::from_str(
            r#"[
                {
                    "restaurantName": "Kopi Corner",
                    "cashBalance": 100.0,
                    "openingHours": "Mon-Fri 7 am - 3 pm",
                    "menu": [
                        { "dishName": "Kaya Toast", "price": 2.5 },
                        { "dishName": "Kopi", "price": 1.8 }
                    ]
                },
                {
                    "restaurantName": "Night Owl",
                    "cashBalance": 50.0,
                    "openingHours": "Sat 8 pm - 2 am",
                    "menu": [{ "dishName": "Kopi", "price": 3.0 }]
                },
                {
                    "restaurantName": "Kopi Corner",
                    "cashBalance": 200.0,
                    "openingHours": "Mon 7 am - 3 pm",
                    "menu": [{ "dishName": "Kaya Toast", "price": 3.5 }]
                }
            ]"#,
        )
        .unwrap()
    }

    fn users() -> Vec<UserRecord> {
        serde_json::from_str(
            r#"[
                {
                    "id": 7,
                    "name": "Ada",
                    "cashBalance": 40.5,
                    "purchaseHistory": [
                        {
                            "dishName": "Kopi",
                            "restaurantName": "Night Owl",
                            "transactionAmount": 3.0,
                            "transactionDate": "02/10/2020 04:09 AM"
                        },
                        {
                            "dishName": "Ramen",
                            "restaurantName": "Gone Cafe",
                            "transactionAmount": 9.0,
                            "transactionDate": "02/11/2020 12:00 PM"
                        }
                    ]
                }
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_populate_loads_deduplicated_restaurants() {
        let pool = test_pool().await;
        let summary = populate(&pool, restaurants(), None).await.unwrap();

        assert_eq!(summary.restaurants, 2);
        assert_eq!(summary.menu_items, 2);
        // Mon (1) + Sat 20:00-24:00 and Sun 00:00-02:00 (2)
        assert_eq!(summary.timings, 3);
        assert_eq!(count_restaurants(&pool).await.unwrap(), 2);

        let kopi = &search_by_name(&pool, &["Kopi Corner"], 10).await.unwrap()[0];
        assert_eq!(kopi.cash_balance, 200.0);
        let menu: Vec<(String, f64)> =
            sqlx::query_as("SELECT dish_name, price FROM menu_items WHERE restaurant_id = ?")
                .bind(kopi.id)
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(menu, vec![("Kaya Toast".to_string(), 3.5)]);

        let days: Vec<i64> =
            sqlx::query_scalar("SELECT day FROM restaurant_timings WHERE restaurant_id = ?")
                .bind(kopi.id)
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(days, vec![0]);
    }

    #[tokio::test]
    async fn test_populate_stores_overnight_carry_over() {
        let pool = test_pool().await;
        populate(&pool, restaurants(), None).await.unwrap();

        let owl = &search_by_name(&pool, &["Night Owl"], 10).await.unwrap()[0];
        let windows: Vec<(i64, i64, i64)> = sqlx::query_as(
            "SELECT day, opens, closes FROM restaurant_timings WHERE restaurant_id = ? ORDER BY id",
        )
        .bind(owl.id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            windows,
            vec![
                (5, 20 * 3600, 86_400),
                (6, i64::from(OPENS_BEFORE_MIDNIGHT), 2 * 3600)
            ]
        );
    }

    #[tokio::test]
    async fn test_purchase_links_dish_of_its_own_restaurant() {
        let pool = test_pool().await;
        let restaurants: Vec<RestaurantRecord> = serde_json::from_str(
            r#"[
                {
                    "restaurantName": "First Cafe",
                    "cashBalance": 0.0,
                    "openingHours": "Mon 7 am - 3 pm",
                    "menu": [{ "dishName": "Latte", "price": 4.0 }]
                },
                {
                    "restaurantName": "Second Cafe",
                    "cashBalance": 0.0,
                    "openingHours": "Mon 7 am - 3 pm",
                    "menu": [{ "dishName": "Latte", "price": 5.0 }]
                }
            ]"#,
        )
        .unwrap();

        let users = user_buying(&[("Second Cafe", "Latte"), ("First Cafe", "Latte")]);
        populate(&pool, restaurants, Some(users)).await.unwrap();

        let linked: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT t.restaurant_id, m.restaurant_id FROM user_transactions t JOIN menu_items m ON m.id = t.menu_item_id ORDER BY t.id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(linked.len(), 2);
        assert!(linked.iter().all(|(purchase, dish)| purchase == dish));
    }

    #[tokio::test]
    async fn test_purchase_falls_back_to_dish_from_any_restaurant() {
        let pool = test_pool().await;
        let users = user_buying(&[("Night Owl", "Kaya Toast")]);
        let summary = populate(&pool, restaurants(), Some(users)).await.unwrap();

        assert_eq!(summary.transactions, 1);
        assert_eq!(
            purchases(&pool).await,
            vec![("Night Owl".to_string(), "Kaya Toast".to_string())]
        );
    }

    #[tokio::test]
    async fn test_populate_links_purchases_and_skips_unknown() {
        let pool = test_pool().await;
        let summary = populate(&pool, restaurants(), Some(users())).await.unwrap();

        assert_eq!(summary.users, 1);
        assert_eq!(summary.transactions, 1);
        assert_eq!(summary.skipped_transactions, 1);
        assert_eq!(count_transactions(&pool).await.unwrap(), 1);

        let (restaurant, date): (String, i64) = sqlx::query_as(
            "SELECT r.name, t.transaction_date FROM user_transactions t JOIN restaurants r ON r.id = t.restaurant_id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(restaurant, "Night Owl");
        assert_eq!(date, 1_581_307_740);
    }

    #[tokio::test]
    async fn test_populate_replaces_previous_data() {
        let pool = test_pool().await;
        populate(&pool, restaurants(), Some(users())).await.unwrap();
        populate(&pool, restaurants(), Some(users())).await.unwrap();

        assert_eq!(count_restaurants(&pool).await.unwrap(), 2);
        assert_eq!(count_transactions(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_populate_rolls_back_on_bad_opening_hours() {
        let pool = test_pool().await;
        populate(&pool, restaurants(), None).await.unwrap();

        let mut broken = restaurants();
        broken[1].opening_hours = "Whenever".to_string();
        let err = populate(&pool, broken, None).await.unwrap_err();

        assert!(matches!(err, ImportError::OpeningHours { .. }));
        assert_eq!(count_restaurants(&pool).await.unwrap(), 2);
    }

    #[test]
    fn test_parse_json_reports_kind() {
        let err = parse_json::<Vec<UserRecord>>(b"{not json", "user").unwrap_err();
        assert!(err.to_string().starts_with("Invalid user seed JSON"));
    }
}
