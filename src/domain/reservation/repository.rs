//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation with status `Pending`, returning it with
    /// its assigned id
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Persist `r`'s mutable fields if and only if the stored row is still
    /// `Pending`. Returns `false` when another transition won the race (or
    /// the row is gone); the caller maps that to `InvalidState`.
    ///
    /// Implementations must perform the status check and the write as one
    /// atomic step (conditional UPDATE / entry lock), never read-then-write.
    async fn update_if_pending(&self, r: &Reservation) -> DomainResult<bool>;

    /// Reservations of a listing with `start_date` strictly after `instant`,
    /// descending by start date
    async fn find_for_listing_starting_after(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Reservations of a listing with `start_date` strictly before `instant`,
    /// descending by start date
    async fn find_for_listing_starting_before(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// All reservations booked by a renter, descending by start date
    async fn find_by_renter(&self, renter_id: &str) -> DomainResult<Vec<Reservation>>;
}
