//! Recency-weighted ranking.
//!
//! Full-text rank (bm25) is negative with more-negative meaning more relevant.
//! Multiplying it by a recency factor at most 1 pulls old articles toward
//! zero, which sorts them later in ascending order.

use crate::types::SearchHit;
use ragnews_core::{AppError, AppResult};
use std::cmp::Ordering;

/// Reject non-positive or non-finite decay constants.
pub fn validate_alpha(timebias_alpha: f64) -> AppResult<()> {
    if !timebias_alpha.is_finite() || timebias_alpha <= 0.0 {
        return Err(AppError::InvalidParameter(format!(
            "timebias_alpha must be a positive number, got {}",
            timebias_alpha
        )));
    }
    Ok(())
}

/// `alpha / (alpha + staleness_days)`.
///
/// For staleness of at least one day and positive alpha this lies in (0, 1)
/// and strictly decreases as the article gets older. Smaller alpha makes age
/// matter more.
pub fn time_bias(timebias_alpha: f64, staleness_days: f64) -> f64 {
    timebias_alpha / (timebias_alpha + staleness_days)
}

pub fn final_score(raw_rank: f64, time_bias: f64) -> f64 {
    raw_rank * time_bias
}

/// Ordering used for results: final score ascending, rowid on ties.
pub fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    a.final_score
        .partial_cmp(&b.final_score)
        .unwrap_or(Ordering::Equal)
        .then(a.rowid.cmp(&b.rowid))
}

/// True when `hits` are in result order.
pub fn is_ranked(hits: &[SearchHit]) -> bool {
    hits.windows(2)
        .all(|pair| compare_hits(&pair[0], &pair[1]) != Ordering::Greater)
}
