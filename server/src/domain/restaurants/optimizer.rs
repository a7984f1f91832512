//! Filter optimizer
//!
//! Turns the requested filter kinds into the final active filter set:
//! duplicates collapse, an empty request becomes `open_at`, and each filter
//! picks up the parameters its predicate needs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::error::FilterError;
use super::params::FilterParams;
use super::vocabulary::FilterKind;

/// Post-aggregation bound on the number of dishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishCountBound {
    MoreThan(i64),
    FewerThan(i64),
}

/// A filter ready for the composer, carrying only its own parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveFilter {
    /// `None` resolves to the current instant when the query is composed
    OpenAt { at: Option<DateTime<Utc>> },
    Price {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    DishCount(DishCountBound),
}

impl ActiveFilter {
    pub fn kind(&self) -> FilterKind {
        match self {
            ActiveFilter::OpenAt { .. } => FilterKind::OpenAt,
            ActiveFilter::Price { .. } => FilterKind::Price,
            ActiveFilter::DishCount(_) => FilterKind::Ndish,
        }
    }
}

pub fn optimize(
    kinds: &[FilterKind],
    params: &FilterParams,
) -> Result<Vec<ActiveFilter>, FilterError> {
    let mut unique: BTreeSet<FilterKind> = kinds.iter().copied().collect();
    if unique.is_empty() {
        unique.insert(FilterKind::DEFAULT);
    }

    unique
        .into_iter()
        .map(|kind| activate(kind, params))
        .collect()
}

fn activate(kind: FilterKind, params: &FilterParams) -> Result<ActiveFilter, FilterError> {
    match kind {
        FilterKind::OpenAt => Ok(ActiveFilter::OpenAt { at: params.open_at }),
        FilterKind::Price => {
            if params.price_lower.is_none() && params.price_upper.is_none() {
                return Err(FilterError::MissingRequiredParameter { filter: kind });
            }
            Ok(ActiveFilter::Price {
                lower: params.price_lower,
                upper: params.price_upper,
            })
        }
        // ndish_gt wins over ndish_lt; the two are never combined
        FilterKind::Ndish => match (params.ndish_gt, params.ndish_lt) {
            (Some(gt), _) => Ok(ActiveFilter::DishCount(DishCountBound::MoreThan(gt))),
            (None, Some(lt)) => Ok(ActiveFilter::DishCount(DishCountBound::FewerThan(lt))),
            (None, None) => Err(FilterError::MissingRequiredParameter { filter: kind }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_defaults_to_open_at() {
        let active = optimize(&[], &FilterParams::default()).unwrap();
        assert_eq!(active, vec![ActiveFilter::OpenAt { at: None }]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let params = FilterParams {
            price_lower: Some(10.0),
            ..Default::default()
        };
        let twice = optimize(&[FilterKind::Price, FilterKind::Price], &params).unwrap();
        let once = optimize(&[FilterKind::Price], &params).unwrap();

        assert_eq!(twice, once);
        assert_eq!(
            once,
            vec![ActiveFilter::Price {
                lower: Some(10.0),
                upper: None
            }]
        );
    }

    #[test]
    fn test_price_without_bounds_is_missing_parameter() {
        let err = optimize(&[FilterKind::Price], &FilterParams::default()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::MissingRequiredParameter {
                filter: FilterKind::Price
            }
        ));
    }

    #[test]
    fn test_ndish_without_bounds_is_missing_parameter() {
        let err = optimize(&[FilterKind::Ndish], &FilterParams::default()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::MissingRequiredParameter {
                filter: FilterKind::Ndish
            }
        ));
    }

    #[test]
    fn test_ndish_gt_takes_precedence_over_lt() {
        let params = FilterParams {
            ndish_gt: Some(5),
            ndish_lt: Some(2),
            ..Default::default()
        };
        let active = optimize(&[FilterKind::Ndish], &params).unwrap();
        assert_eq!(
            active,
            vec![ActiveFilter::DishCount(DishCountBound::MoreThan(5))]
        );
    }

    #[test]
    fn test_ndish_lt_alone() {
        let params = FilterParams {
            ndish_lt: Some(3),
            ..Default::default()
        };
        let active = optimize(&[FilterKind::Ndish], &params).unwrap();
        assert_eq!(
            active,
            vec![ActiveFilter::DishCount(DishCountBound::FewerThan(3))]
        );
    }

    #[test]
    fn test_open_at_ignores_price_params_when_not_selected() {
        let params = FilterParams {
            price_lower: Some(1.0),
            ..Default::default()
        };
        let active = optimize(&[FilterKind::OpenAt], &params).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind(), FilterKind::OpenAt);
    }

    #[test]
    fn test_all_filters_active() {
        let params = FilterParams {
            price_upper: Some(20.0),
            ndish_lt: Some(10),
            ..Default::default()
        };
        let active = optimize(
            &[FilterKind::Ndish, FilterKind::Price, FilterKind::OpenAt],
            &params,
        )
        .unwrap();
        let kinds: Vec<_> = active.iter().map(ActiveFilter::kind).collect();
        assert_eq!(
            kinds,
            vec![FilterKind::OpenAt, FilterKind::Price, FilterKind::Ndish]
        );
    }
}
