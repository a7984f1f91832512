//! Domain logic for restaurant discovery
//!
//! - `restaurants` - filtered restaurant listing
//! - `search` - text search over restaurants and dishes
//! - `seed` - seed data download and import

pub mod restaurants;
pub mod search;
pub mod seed;

pub use restaurants::{FilterError, RestaurantFilter};
pub use search::SearchError;
pub use seed::ImportError;
