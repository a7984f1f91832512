//! Data storage layer
//!
//! - `sqlite` - database service, schema, migrations and repositories
//! - `types` - row types shared by repositories and the domain layer
//! - `error` - unified error type surfaced to the domain and API layers

pub mod error;
pub mod sqlite;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
