//! Row types for the restaurant tables
//!
//! Times of day are stored as seconds since midnight and days as
//! Monday=0..Sunday=6, so the restaurant filter can compare them directly.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Restaurant row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub name: String,
    pub cash_balance: f64,
}

/// Menu item row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub restaurant_id: i64,
    pub dish_name: String,
    pub price: f64,
}

// ============================================================================
// Insert payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub dish_name: String,
    pub price: f64,
}

/// Opening time stored for the part of an overnight window that runs on
/// past midnight, so the strict `opens < time` test also holds at 00:00:00
pub const OPENS_BEFORE_MIDNIGHT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTiming {
    pub day: u8,
    pub opens: i32,
    pub closes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserTransaction {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub menu_item_id: i64,
    pub transaction_amount: f64,
    /// Unix seconds (UTC)
    pub transaction_date: i64,
}
