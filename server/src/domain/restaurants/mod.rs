//! Restaurant filtering
//!
//! Pipeline for `GET /api/restaurant`:
//! - `vocabulary` - filter names and the filter-set validator
//! - `params` - raw parameter normalization
//! - `optimizer` - dedup, default filter and required-bound checks
//! - `compose` - join-tracking query composition and execution
//! - `projector` - response shaping

pub mod compose;
pub mod error;
pub mod optimizer;
pub mod params;
pub mod projector;
pub mod vocabulary;

pub use compose::{JoinRegistry, QueryPlan, Relation};
pub use error::FilterError;
pub use optimizer::{ActiveFilter, DishCountBound};
pub use params::{FilterParams, RawFilterParams, RawInstant};
pub use projector::{Entities, ResponseShape, RestaurantSummary, project};
pub use vocabulary::{FILTER_VOCABULARY, FilterKind, validate_filter_names};

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::data::types::RestaurantRow;

/// A validated, ready-to-run restaurant filter
#[derive(Debug, Clone)]
pub struct RestaurantFilter {
    filters: Vec<ActiveFilter>,
    limit: Option<u32>,
}

impl RestaurantFilter {
    /// Vocabulary check run by the HTTP layer before construction
    pub fn validate_filters<S: AsRef<str>>(names: &[S]) -> bool {
        validate_filter_names(names, &FILTER_VOCABULARY)
    }

    /// Validate names, normalize parameters and settle the active filter set
    pub fn new<S: AsRef<str>>(names: &[S], raw: RawFilterParams) -> Result<Self, FilterError> {
        let kinds = vocabulary::parse_filter_names(names)?;
        let params = params::normalize(raw)?;
        let filters = optimizer::optimize(&kinds, &params)?;
        Ok(Self {
            filters,
            limit: params.limit,
        })
    }

    pub fn active_filters(&self) -> &[ActiveFilter] {
        &self.filters
    }

    /// Compose the query as it would run at instant `now`
    pub fn plan_at(&self, now: DateTime<Utc>) -> QueryPlan {
        compose::compose(&self.filters, now, self.limit)
    }

    /// Run the filter against the database
    pub async fn get_filtered_restaurants(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<RestaurantRow>, FilterError> {
        let plan = self.plan_at(Utc::now());
        tracing::debug!(
            filters = ?self.filters.iter().map(ActiveFilter::kind).collect::<Vec<_>>(),
            joins = ?plan.joins,
            limit = ?self.limit,
            "Running restaurant filter"
        );

        let rows = compose::execute(&plan, pool).await?;
        tracing::debug!(count = rows.len(), "Restaurant filter matched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{insert_menu_items, insert_restaurant, insert_timings};
    use crate::data::sqlite::test_pool;
    use crate::data::DataError;
    use crate::data::types::{NewMenuItem, NewTiming};
    use crate::domain::seed::transform::parse_opening_hours;
    use chrono::TimeZone;

    const NINE_AM: i32 = 9 * 3600;
    const FIVE_PM: i32 = 17 * 3600;

    fn dishes(prices: &[f64]) -> Vec<NewMenuItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| NewMenuItem {
                dish_name: format!("Dish {i}"),
                price,
            })
            .collect()
    }

    async fn add_restaurant(
        pool: &SqlitePool,
        name: &str,
        timings: &[NewTiming],
        prices: &[f64],
    ) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        let id = insert_restaurant(&mut conn, name, 0.0).await.unwrap();
        insert_timings(&mut conn, id, timings).await.unwrap();
        insert_menu_items(&mut conn, id, &dishes(prices)).await.unwrap();
        id
    }

    fn monday(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn open_monday() -> [NewTiming; 1] {
        [NewTiming {
            day: 0,
            opens: NINE_AM,
            closes: FIVE_PM,
        }]
    }

    fn raw_at(at: DateTime<Utc>) -> RawFilterParams {
        RawFilterParams {
            open_at: Some(at.timestamp().into()),
            ..Default::default()
        }
    }

    async fn names(filter: &RestaurantFilter, pool: &SqlitePool) -> Vec<String> {
        filter
            .get_filtered_restaurants(pool)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect()
    }

    #[tokio::test]
    async fn test_open_at_with_price_lower_bound() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Morning Bites", &open_monday(), &[5.0, 15.0]).await;

        let matching = RestaurantFilter::new(
            &["open_at", "price"],
            RawFilterParams {
                price_lower: Some(10.0),
                ..raw_at(monday(10, 0, 0))
            },
        )
        .unwrap();
        assert_eq!(names(&matching, &pool).await, vec!["Morning Bites"]);

        let too_expensive = RestaurantFilter::new(
            &["open_at", "price"],
            RawFilterParams {
                price_lower: Some(20.0),
                ..raw_at(monday(10, 0, 0))
            },
        )
        .unwrap();
        assert!(names(&too_expensive, &pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_at_window_is_strict() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Lunchbox", &open_monday(), &[]).await;

        let at = |h, m, s| RestaurantFilter::new(&["open_at"], raw_at(monday(h, m, s))).unwrap();

        assert!(names(&at(9, 0, 0), &pool).await.is_empty());
        assert_eq!(names(&at(9, 0, 1), &pool).await, vec!["Lunchbox"]);
        assert_eq!(names(&at(16, 59, 59), &pool).await, vec!["Lunchbox"]);
        assert!(names(&at(17, 0, 0), &pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_at_checks_weekday() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Weekday Only", &open_monday(), &[]).await;

        // 2024-01-02 is a Tuesday
        let tuesday = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let filter = RestaurantFilter::new(&["open_at"], raw_at(tuesday)).unwrap();
        assert!(names(&filter, &pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_price_matches_are_distinct() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Buffet", &open_monday(), &[11.0, 12.0, 13.0]).await;

        let filter = RestaurantFilter::new(
            &["price"],
            RawFilterParams {
                price_lower: Some(10.0),
                price_upper: Some(20.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&filter, &pool).await, vec!["Buffet"]);
    }

    #[tokio::test]
    async fn test_ndish_counts_dishes() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Empty", &open_monday(), &[]).await;
        add_restaurant(&pool, "Small", &open_monday(), &[1.0, 2.0]).await;
        add_restaurant(&pool, "Large", &open_monday(), &[1.0, 2.0, 3.0, 4.0, 5.0]).await;

        let more_than = RestaurantFilter::new(
            &["ndish"],
            RawFilterParams {
                ndish_gt: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&more_than, &pool).await, vec!["Large"]);

        let fewer_than = RestaurantFilter::new(
            &["ndish"],
            RawFilterParams {
                ndish_lt: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&fewer_than, &pool).await, vec!["Empty", "Small"]);
    }

    #[tokio::test]
    async fn test_ndish_gt_wins_over_lt() {
        let pool = test_pool().await;
        add_restaurant(&pool, "Small", &open_monday(), &[1.0]).await;
        add_restaurant(&pool, "Large", &open_monday(), &[1.0; 6]).await;

        let filter = RestaurantFilter::new(
            &["ndish"],
            RawFilterParams {
                ndish_gt: Some(5),
                ndish_lt: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&filter, &pool).await, vec!["Large"]);
    }

    #[tokio::test]
    async fn test_ndish_not_inflated_by_timing_rows() {
        let pool = test_pool().await;
        let every_day: Vec<NewTiming> = (0..7)
            .map(|day| NewTiming {
                day,
                opens: 0,
                closes: 86_400,
            })
            .collect();
        add_restaurant(&pool, "Always Open", &every_day, &[1.0, 2.0]).await;

        let filter = RestaurantFilter::new(
            &["ndish", "open_at"],
            RawFilterParams {
                ndish_gt: Some(2),
                ..raw_at(monday(12, 0, 0))
            },
        )
        .unwrap();
        assert!(names(&filter, &pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_limit_caps_results() {
        let pool = test_pool().await;
        for name in ["A", "B", "C"] {
            add_restaurant(&pool, name, &open_monday(), &[10.0]).await;
        }

        let filter = RestaurantFilter::new(
            &["price"],
            RawFilterParams {
                price_upper: Some(10.0),
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&filter, &pool).await, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_overnight_hours_have_no_gap_at_midnight() {
        let pool = test_pool().await;
        let late = parse_opening_hours("Sun 10 pm - 2 am").unwrap();
        add_restaurant(&pool, "Late Bar", &late, &[8.0]).await;

        let open_at = |at: DateTime<Utc>| RestaurantFilter::new(&["open_at"], raw_at(at)).unwrap();
        let sunday_night = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();

        assert_eq!(names(&open_at(sunday_night), &pool).await, vec!["Late Bar"]);
        assert_eq!(names(&open_at(monday(0, 0, 0)), &pool).await, vec!["Late Bar"]);
        assert_eq!(names(&open_at(monday(1, 59, 59)), &pool).await, vec!["Late Bar"]);
        assert!(names(&open_at(monday(2, 0, 0)), &pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_window_opening_at_midnight_is_closed_at_midnight() {
        let pool = test_pool().await;
        let early = parse_opening_hours("Mon 12 am - 6 am").unwrap();
        add_restaurant(&pool, "Early Bakery", &early, &[2.0]).await;

        let filter = RestaurantFilter::new(&["open_at"], raw_at(monday(0, 0, 0))).unwrap();
        assert!(names(&filter, &pool).await.is_empty());
        let filter = RestaurantFilter::new(&["open_at"], raw_at(monday(0, 0, 1))).unwrap();
        assert_eq!(names(&filter, &pool).await, vec!["Early Bakery"]);
    }

    #[tokio::test]
    async fn test_storage_failure_passes_through() {
        let pool = test_pool().await;
        pool.close().await;

        let filter = RestaurantFilter::new(&["open_at"], raw_at(monday(12, 0, 0))).unwrap();
        let err = filter.get_filtered_restaurants(&pool).await.unwrap_err();
        assert!(
            matches!(
                err,
                FilterError::StorageFailure(DataError::Sqlite(sqlx::Error::PoolClosed))
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_new_rejects_bad_names_before_params() {
        let err = RestaurantFilter::new(
            &["price", "stars"],
            RawFilterParams {
                open_at: Some(RawInstant::Epoch(i64::MAX)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterSet));
    }

    #[test]
    fn test_new_defaults_to_open_at() {
        let empty: [&str; 0] = [];
        let filter = RestaurantFilter::new(&empty, RawFilterParams::default()).unwrap();
        assert_eq!(
            filter.active_filters(),
            &[ActiveFilter::OpenAt { at: None }]
        );
    }

    #[test]
    fn test_duplicate_names_give_identical_plan() {
        let raw = RawFilterParams {
            price_lower: Some(3.0),
            ..Default::default()
        };
        let now = monday(8, 0, 0);
        let once = RestaurantFilter::new(&["price"], raw.clone()).unwrap();
        let twice = RestaurantFilter::new(&["price", "price"], raw).unwrap();
        assert_eq!(once.plan_at(now), twice.plan_at(now));
    }

    #[test]
    fn test_validate_filters() {
        assert!(RestaurantFilter::validate_filters(&["open_at", "ndish"]));
        assert!(!RestaurantFilter::validate_filters(&["open"]));
        assert!(!RestaurantFilter::validate_filters(&[
            "price", "price", "price", "price"
        ]));
    }
}
