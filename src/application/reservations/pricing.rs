//! Rental pricing
//!
//! Pure arithmetic over integer minor units, shared by create and
//! reschedule so both derive the total the same way without re-reading
//! any global state.

use crate::domain::{DomainError, DomainResult, Listing};

/// Total charge for renting at `rate_price` per day for `duration_days`.
pub fn rental_total(duration_days: i64, rate_price: i64) -> i64 {
    duration_days * rate_price
}

/// Validated duration + total pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub duration_days: i64,
    pub total: i64,
}

/// Price a booking window against a listing's current rate.
pub fn quote(duration_days: i64, listing: &Listing) -> DomainResult<Quote> {
    if duration_days < 1 {
        return Err(DomainError::Validation(format!(
            "duration must be at least 1 day, got {}",
            duration_days
        )));
    }
    Ok(Quote {
        duration_days,
        total: rental_total(duration_days, listing.rate_price),
    })
}
