//! Restaurant filter errors

use thiserror::Error;

use super::vocabulary::FilterKind;
use crate::data::DataError;

/// Failures of the restaurant filter pipeline
///
/// Everything except `StorageFailure` is detected before a query is built.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Unknown filter name, or more names than the vocabulary holds
    #[error("Invalid filters.")]
    InvalidFilterSet,

    /// A raw parameter could not be coerced to its typed form
    #[error("Invalid value for query parameter '{field}'.")]
    InvalidParameter { field: &'static str },

    /// A selected filter is missing all of its bounds
    #[error("Filter {filter} requires at least one of {}.", .filter.required_params().join(" or "))]
    MissingRequiredParameter { filter: FilterKind },

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DataError),
}
