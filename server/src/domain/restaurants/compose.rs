//! Filter composer
//!
//! Each active filter contributes joins and predicates to one
//! [`QueryPlan`]. A [`JoinRegistry`] scoped to a single build pass makes sure
//! a relation is joined at most once, however many filters need it. The plan
//! renders to a parameterized `QueryBuilder` and runs on a pooled connection
//! held only for the duration of the call.

use chrono::{DateTime, Datelike, Timelike, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::optimizer::{ActiveFilter, DishCountBound};
use crate::data::DataError;
use crate::data::types::RestaurantRow;

const RESTAURANT_COLUMNS: &str = "r.id, r.name, r.cash_balance";

/// Child relations of a restaurant that filters may join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Timings,
    Menu,
}

impl Relation {
    fn join_clause(&self) -> &'static str {
        match self {
            // A restaurant without timings can never be open
            Relation::Timings => " JOIN restaurant_timings t ON t.restaurant_id = r.id",
            // LEFT so that restaurants without dishes still count as zero
            Relation::Menu => " LEFT JOIN menu_items m ON m.restaurant_id = r.id",
        }
    }
}

/// Relations already joined during one build pass, in join order
#[derive(Debug, Default)]
pub struct JoinRegistry {
    joined: Vec<Relation>,
}

impl JoinRegistry {
    /// Mark `relation` joined. Returns false if it already was.
    pub fn join(&mut self, relation: Relation) -> bool {
        if self.contains(relation) {
            return false;
        }
        self.joined.push(relation);
        true
    }

    pub fn contains(&self, relation: Relation) -> bool {
        self.joined.contains(&relation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    DayIs(u32),
    OpensBefore(u32),
    ClosesAfter(u32),
    PriceAtLeast(f64),
    PriceAtMost(f64),
}

impl Condition {
    fn push(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
        match *self {
            Condition::DayIs(day) => builder.push("t.day = ").push_bind(i64::from(day)),
            Condition::OpensBefore(secs) => builder.push("t.opens < ").push_bind(i64::from(secs)),
            Condition::ClosesAfter(secs) => {
                builder.push("t.closes > ").push_bind(i64::from(secs))
            }
            Condition::PriceAtLeast(price) => builder.push("m.price >= ").push_bind(price),
            Condition::PriceAtMost(price) => builder.push("m.price <= ").push_bind(price),
        };
    }
}

/// Structured form of the composed query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub joins: Vec<Relation>,
    pub conditions: Vec<Condition>,
    /// Present only when the dish-count filter is active
    pub having: Option<DishCountBound>,
    pub limit: Option<u32>,
}

impl QueryPlan {
    /// Grouping by restaurant already yields one row per restaurant
    pub fn is_grouped(&self) -> bool {
        self.having.is_some()
    }

    pub fn render(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new("SELECT ");
        if !self.is_grouped() {
            builder.push("DISTINCT ");
        }
        builder.push(RESTAURANT_COLUMNS).push(" FROM restaurants r");

        for relation in &self.joins {
            builder.push(relation.join_clause());
        }

        for (i, condition) in self.conditions.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            condition.push(&mut builder);
        }

        if let Some(bound) = self.having {
            builder
                .push(" GROUP BY ")
                .push(RESTAURANT_COLUMNS)
                .push(" HAVING COUNT(DISTINCT m.id) ");
            match bound {
                DishCountBound::MoreThan(n) => builder.push("> ").push_bind(n),
                DishCountBound::FewerThan(n) => builder.push("< ").push_bind(n),
            };
        }

        builder.push(" ORDER BY r.id");
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }
        builder
    }
}

/// Mutable state threaded through the predicate-building steps
struct BuildContext {
    now: DateTime<Utc>,
    joins: JoinRegistry,
    conditions: Vec<Condition>,
    having: Option<DishCountBound>,
}

impl ActiveFilter {
    fn apply(&self, ctx: &mut BuildContext) {
        match *self {
            ActiveFilter::OpenAt { at } => {
                let at = at.unwrap_or(ctx.now);
                let day = at.weekday().num_days_from_monday();
                let secs = at.num_seconds_from_midnight();
                ctx.joins.join(Relation::Timings);
                ctx.conditions.extend([
                    Condition::DayIs(day),
                    Condition::OpensBefore(secs),
                    Condition::ClosesAfter(secs),
                ]);
            }
            ActiveFilter::Price { lower, upper } => {
                ctx.joins.join(Relation::Menu);
                if let Some(lower) = lower {
                    ctx.conditions.push(Condition::PriceAtLeast(lower));
                }
                if let Some(upper) = upper {
                    ctx.conditions.push(Condition::PriceAtMost(upper));
                }
            }
            ActiveFilter::DishCount(bound) => {
                ctx.joins.join(Relation::Menu);
                ctx.having = Some(bound);
            }
        }
    }
}

/// Compose the active filters into one plan
///
/// `now` stands in for any open-at filter without an explicit instant.
pub fn compose(filters: &[ActiveFilter], now: DateTime<Utc>, limit: Option<u32>) -> QueryPlan {
    let mut ctx = BuildContext {
        now,
        joins: JoinRegistry::default(),
        conditions: Vec::new(),
        having: None,
    };
    for filter in filters {
        filter.apply(&mut ctx);
    }

    QueryPlan {
        joins: ctx.joins.joined,
        conditions: ctx.conditions,
        having: ctx.having,
        limit,
    }
}

/// Run a plan on a connection acquired for this call only
pub async fn execute(plan: &QueryPlan, pool: &SqlitePool) -> Result<Vec<RestaurantRow>, DataError> {
    let mut conn = pool.acquire().await?;
    let rows = plan
        .render()
        .build_query_as::<RestaurantRow>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}
