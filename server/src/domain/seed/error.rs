//! Seed import errors

use thiserror::Error;

use crate::data::DataError;
use crate::data::sqlite::SqliteError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Seed download from {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid {what} seed JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unparseable opening hours: '{segment}'")]
    OpeningHours { segment: String },

    #[error("Unparseable transaction date: '{0}'")]
    TransactionDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage failure: {0}")]
    Storage(#[from] DataError),
}

impl From<SqliteError> for ImportError {
    fn from(e: SqliteError) -> Self {
        Self::Storage(e.into())
    }
}

impl From<sqlx::Error> for ImportError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.into())
    }
}
