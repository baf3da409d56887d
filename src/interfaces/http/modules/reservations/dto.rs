//! Reservation DTOs
//!
//! Responses embed the listing plus owner and renter identity summaries
//! instead of raw foreign keys; consumers depend on that shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::reservations::ReservationDetail;
use crate::domain::{DomainError, DomainResult, User};

/// Request body for creating or rescheduling a reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookingRequest {
    /// First day of the rental, "YYYY-MM-DD"
    pub start_date: String,
    /// Rental length in whole days
    #[validate(range(min = 1, message = "duration must be at least 1 day"))]
    pub duration: i64,
}

/// Request body for cancelling a reservation
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelRequest {
    pub cancellation_reason: Option<String>,
}

/// Parse a "YYYY-MM-DD" start date as UTC midnight.
pub fn parse_start_date(s: &str) -> DomainResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        DomainError::Validation(format!("invalid start_date '{}': {}", s, e))
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Party identity embedded in reservation responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PartySummaryDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for PartySummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Listing identity embedded in reservation responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookedListingDto {
    pub id: i32,
    pub title: String,
    pub rate_price: i64,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    /// "YYYY-MM-DD"
    pub start_date: String,
    /// "YYYY-MM-DD", derived from start_date + duration
    pub end_date: String,
    pub duration: i64,
    pub status: String,
    pub total: i64,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub listing: BookedListingDto,
    pub listing_owner: PartySummaryDto,
    pub renter: PartySummaryDto,
}

impl From<ReservationDetail> for ReservationDto {
    fn from(detail: ReservationDetail) -> Self {
        let r = detail.reservation;
        Self {
            id: r.id,
            start_date: r.start_date.date_naive().to_string(),
            end_date: r.end_date().date_naive().to_string(),
            duration: r.duration_days,
            status: r.status.to_string(),
            total: r.total,
            cancellation_reason: r.cancellation_reason.clone(),
            created_at: r.created_at.to_rfc3339(),
            listing: BookedListingDto {
                id: detail.listing.id,
                title: detail.listing.title,
                rate_price: detail.listing.rate_price,
            },
            listing_owner: PartySummaryDto::from(detail.owner),
            renter: PartySummaryDto::from(detail.renter),
        }
    }
}
