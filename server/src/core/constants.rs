// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Frenzy";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "frenzy";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".frenzy";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "frenzy.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FRENZY_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "FRENZY_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FRENZY_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FRENZY_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FRENZY_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5388;

/// Default request body limit (all endpoints are GET)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Seconds to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "FRENZY_DATA_DIR";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// SQLite connection URL (`sqlite://path/to/file.db`)
pub const ENV_DATABASE_URL: &str = "FRENZY_DATABASE_URL";

/// Maximum pooled connections
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "FRENZY_DATABASE_MAX_CONNECTIONS";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "frenzy.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// Pages written before SQLite checkpoints the WAL on its own
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval for the background WAL checkpoint task
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Environment Variables - Seed Data
// =============================================================================

pub const ENV_SEED_RESTAURANTS_URL: &str = "FRENZY_SEED_RESTAURANTS_URL";
pub const ENV_SEED_USERS_URL: &str = "FRENZY_SEED_USERS_URL";

// =============================================================================
// Seed Data Defaults
// =============================================================================

/// Restaurant listing with menus and opening hours
pub const DEFAULT_SEED_RESTAURANTS_URL: &str = "https://gist.githubusercontent.com/seahyc/b9ebbe264f8633a1bf167cc6a90d4b57/raw/021d2e0d2c56217bad524119d1c31419b2938505/restaurant_with_menu.json";

/// Users with purchase history
pub const DEFAULT_SEED_USERS_URL: &str = "https://gist.githubusercontent.com/seahyc/de33162db680c3d595e955752178d57d/raw/785007bc91c543f847b87d705499e86e16961379/users_with_purchase_history.json";

/// File names for the raw seed copies saved under the data directory
pub const SEED_RESTAURANTS_FILENAME: &str = "restaurant_db.json";
pub const SEED_USERS_FILENAME: &str = "user.json";

/// Timeout for seed downloads
pub const SEED_FETCH_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Restaurant Queries
// =============================================================================

/// Maximum `limit` accepted by the restaurant listing
pub const MAX_RESTAURANT_LIMIT: u32 = 500;

/// Maximum search terms considered per query
pub const MAX_SEARCH_TERMS: usize = 10;

/// Maximum rows returned per entity kind by search
pub const SEARCH_RESULT_LIMIT: u32 = 50;
