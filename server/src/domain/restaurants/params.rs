//! Query parameter normalizer
//!
//! Coerces raw caller input into typed values. Absent inputs stay absent;
//! defaults are applied later by the optimizer.

use chrono::{DateTime, Utc};

use super::error::FilterError;
use crate::core::constants::MAX_RESTAURANT_LIMIT;

/// Point in time as supplied by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInstant {
    /// Seconds since the Unix epoch
    Epoch(i64),
    At(DateTime<Utc>),
}

impl From<i64> for RawInstant {
    fn from(secs: i64) -> Self {
        RawInstant::Epoch(secs)
    }
}

impl From<DateTime<Utc>> for RawInstant {
    fn from(at: DateTime<Utc>) -> Self {
        RawInstant::At(at)
    }
}

/// Raw, untyped filter parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFilterParams {
    pub open_at: Option<RawInstant>,
    pub price_lower: Option<f64>,
    pub price_upper: Option<f64>,
    pub ndish_gt: Option<i64>,
    pub ndish_lt: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized filter parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub open_at: Option<DateTime<Utc>>,
    pub price_lower: Option<f64>,
    pub price_upper: Option<f64>,
    pub ndish_gt: Option<i64>,
    pub ndish_lt: Option<i64>,
    pub limit: Option<u32>,
}

pub fn normalize(raw: RawFilterParams) -> Result<FilterParams, FilterError> {
    let open_at = raw.open_at.map(to_instant).transpose()?;

    Ok(FilterParams {
        open_at,
        price_lower: finite(raw.price_lower, "price_lower")?,
        price_upper: finite(raw.price_upper, "price_upper")?,
        ndish_gt: raw.ndish_gt,
        ndish_lt: raw.ndish_lt,
        limit: raw.limit.map(to_limit).transpose()?,
    })
}

fn to_instant(raw: RawInstant) -> Result<DateTime<Utc>, FilterError> {
    match raw {
        RawInstant::At(at) => Ok(at),
        RawInstant::Epoch(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or(FilterError::InvalidParameter { field: "open_at" }),
    }
}

fn finite(value: Option<f64>, field: &'static str) -> Result<Option<f64>, FilterError> {
    match value {
        Some(v) if !v.is_finite() => Err(FilterError::InvalidParameter { field }),
        other => Ok(other),
    }
}

fn to_limit(limit: i64) -> Result<u32, FilterError> {
    u32::try_from(limit)
        .ok()
        .filter(|l| (1..=MAX_RESTAURANT_LIMIT).contains(l))
        .ok_or(FilterError::InvalidParameter { field: "limit" })
}
