//! SQLite schema definitions
//!
//! Initial schema with all tables.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Restaurants
-- =============================================================================
CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    cash_balance REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_restaurants_name ON restaurants(name);

-- =============================================================================
-- 2. Menu items (references restaurants)
-- =============================================================================
CREATE TABLE IF NOT EXISTS menu_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
    dish_name TEXT NOT NULL,
    price REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_menu_items_restaurant ON menu_items(restaurant_id);
CREATE INDEX IF NOT EXISTS idx_menu_items_dish_name ON menu_items(dish_name);
CREATE INDEX IF NOT EXISTS idx_menu_items_price ON menu_items(price);

-- =============================================================================
-- 3. Restaurant timings (references restaurants)
-- day: Monday=0..Sunday=6, opens/closes: seconds since midnight
-- opens = -1 marks a window carried over from the previous evening
-- =============================================================================
CREATE TABLE IF NOT EXISTS restaurant_timings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
    day INTEGER NOT NULL CHECK(day >= 0 AND day <= 6),
    opens INTEGER NOT NULL CHECK(opens >= -1 AND opens < 86400),
    closes INTEGER NOT NULL CHECK(closes >= 0 AND closes <= 86400)
);

CREATE INDEX IF NOT EXISTS idx_timings_restaurant ON restaurant_timings(restaurant_id);
CREATE INDEX IF NOT EXISTS idx_timings_window ON restaurant_timings(day, opens, closes);

-- =============================================================================
-- 4. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    cash_balance REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_users_external_id ON users(external_id);

-- =============================================================================
-- 5. User transactions (references users, restaurants, menu items)
-- =============================================================================
CREATE TABLE IF NOT EXISTS user_transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
    menu_item_id INTEGER NOT NULL REFERENCES menu_items(id) ON DELETE CASCADE,
    transaction_amount REAL NOT NULL,
    transaction_date INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_user_transactions_user ON user_transactions(user_id);
"#;
