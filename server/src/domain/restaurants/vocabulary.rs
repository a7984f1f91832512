//! Filter vocabulary and the filter-set validator
//!
//! The external vocabulary is a fixed list of strings; internally each name
//! maps to a [`FilterKind`] so unknown names cannot travel past this module.

use std::fmt;
use std::str::FromStr;

use super::error::FilterError;

/// Filter names accepted from callers, in declaration order
pub const FILTER_VOCABULARY: [&str; 3] = [
    FilterKind::OpenAt.as_str(),
    FilterKind::Price.as_str(),
    FilterKind::Ndish.as_str(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKind {
    /// Open at a given instant (defaults to now)
    OpenAt,
    /// At least one menu item within a price range
    Price,
    /// Number of dishes above or below a bound
    Ndish,
}

impl FilterKind {
    /// Applied when the caller selects no filter at all
    pub const DEFAULT: FilterKind = FilterKind::OpenAt;

    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterKind::OpenAt => "open_at",
            FilterKind::Price => "price",
            FilterKind::Ndish => "ndish",
        }
    }

    /// Parameters of which at least one must be present when selected
    pub const fn required_params(&self) -> &'static [&'static str] {
        match self {
            FilterKind::OpenAt => &[],
            FilterKind::Price => &["price_lower", "price_upper"],
            FilterKind::Ndish => &["ndish_gt", "ndish_lt"],
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open_at" => Ok(FilterKind::OpenAt),
            "price" => Ok(FilterKind::Price),
            "ndish" => Ok(FilterKind::Ndish),
            _ => Err(FilterError::InvalidFilterSet),
        }
    }
}

/// Check requested names against a vocabulary
///
/// Fails when more names are given than the vocabulary holds, even if every
/// name is known, or when any name is outside the vocabulary.
pub fn validate_filter_names<S: AsRef<str>>(names: &[S], vocabulary: &[&str]) -> bool {
    names.len() <= vocabulary.len()
        && names
            .iter()
            .all(|name| vocabulary.contains(&name.as_ref()))
}

/// Validate and convert requested names to filter kinds (duplicates kept)
pub fn parse_filter_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<FilterKind>, FilterError> {
    if !validate_filter_names(names, &FILTER_VOCABULARY) {
        return Err(FilterError::InvalidFilterSet);
    }
    names.iter().map(|name| name.as_ref().parse()).collect()
}
