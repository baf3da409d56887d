//! Reservation domain entity
//!
//! A reservation is a time-bounded booking of a listing by a renter. Only a
//! `Pending` reservation whose window has not yet started may be mutated;
//! every transition method enforces both guards before touching state.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DomainError, DomainResult};

/// Reservation status
///
/// `Pending` is the only mutable state. `Declined`, `Cancelled` and
/// `Completed` are terminal. Nothing currently produces `Completed`; it is
/// kept so stored rows from a future completion flow parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Awaiting the listing owner's decision
    Pending,
    /// Approved by the listing owner
    Accepted,
    /// Rejected by the listing owner
    Declined,
    /// Withdrawn by the renter
    Cancelled,
    /// Rental period finished
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Cancelled | Self::Completed)
    }
}

impl TryFrom<&str> for ReservationStatus {
    type Error = DomainError;

    /// Fails closed: an unknown stored value is a data error, never coerced.
    fn try_from(s: &str) -> DomainResult<Self> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Declined" => Ok(Self::Declined),
            "Cancelled" => Ok(Self::Cancelled),
            "Completed" => Ok(Self::Completed),
            other => Err(DomainError::Storage(format!(
                "unknown reservation status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking of a listing by a renter for a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: i32,
    /// Listing being booked
    pub listing_id: i32,
    /// User who booked it
    pub renter_id: String,
    /// First day of the booking window (UTC midnight)
    pub start_date: DateTime<Utc>,
    /// Whole days, >= 1
    pub duration_days: i64,
    /// Current status
    pub status: ReservationStatus,
    /// Price snapshot taken at the last successful create/reschedule
    pub total: i64,
    /// Free text recorded on cancellation
    pub cancellation_reason: Option<String>,
    /// When the reservation was created
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// End of the booking window, always derived from `start_date` and
    /// `duration_days` so it can never drift out of sync with the pair.
    pub fn end_date(&self) -> DateTime<Utc> {
        self.start_date + Duration::days(self.duration_days)
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }

    /// Whether the booking window starts strictly after `instant`.
    pub fn starts_after(&self, instant: DateTime<Utc>) -> bool {
        self.start_date > instant
    }

    /// Both mutation guards: status must be `Pending`, and the *current*
    /// window must not have started yet.
    fn guard_mutable(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::InvalidState(format!(
                "reservation {} is {}, only Pending reservations can change",
                self.id, self.status
            )));
        }
        if !self.starts_after(now) {
            return Err(DomainError::StaleBooking(format!(
                "reservation {} window already started on {}",
                self.id,
                self.start_date.date_naive()
            )));
        }
        Ok(())
    }

    /// Move the booking window. The total is recomputed by the caller from
    /// the listing's current rate and passed in; the guard runs against the
    /// window *before* the update.
    pub fn reschedule(
        &mut self,
        start_date: DateTime<Utc>,
        duration_days: i64,
        total: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.guard_mutable(now)?;
        self.start_date = start_date;
        self.duration_days = duration_days;
        self.total = total;
        Ok(())
    }

    /// Owner approves the request. One-way.
    pub fn accept(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.guard_mutable(now)?;
        self.status = ReservationStatus::Accepted;
        Ok(())
    }

    /// Owner rejects the request. Terminal.
    pub fn decline(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.guard_mutable(now)?;
        self.status = ReservationStatus::Declined;
        Ok(())
    }

    /// Renter withdraws the request, optionally with a reason. Terminal.
    pub fn cancel(&mut self, reason: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.guard_mutable(now)?;
        self.status = ReservationStatus::Cancelled;
        self.cancellation_reason = reason;
        Ok(())
    }
}

/// Reservation awaiting persistence (id assigned by the repository,
/// status always starts at `Pending`).
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub listing_id: i32,
    pub renter_id: String,
    pub start_date: DateTime<Utc>,
    pub duration_days: i64,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: 1,
            listing_id: 10,
            renter_id: "u-renter".to_string(),
            start_date: day(2099, 1, 10),
            duration_days: 6,
            status: ReservationStatus::Pending,
            total: 3000,
            cancellation_reason: None,
            created_at: day(2098, 12, 1),
        }
    }

    #[test]
    fn end_date_is_start_plus_duration() {
        let r = sample_reservation();
        assert_eq!(r.end_date(), day(2099, 1, 16));
        assert!(r.end_date() > r.start_date);
    }

    #[test]
    fn end_date_tracks_reschedule() {
        let mut r = sample_reservation();
        r.reschedule(day(2099, 2, 1), 3, 1500, day(2098, 12, 15))
            .unwrap();
        assert_eq!(r.end_date(), day(2099, 2, 4));
        assert_eq!(r.total, 1500);
        assert_eq!(r.status, ReservationStatus::Pending);
    }

    #[test]
    fn accept_moves_pending_to_accepted() {
        let mut r = sample_reservation();
        r.accept(day(2099, 1, 1)).unwrap();
        assert_eq!(r.status, ReservationStatus::Accepted);
    }

    #[test]
    fn decline_after_accept_is_invalid_state() {
        let mut r = sample_reservation();
        r.accept(day(2099, 1, 1)).unwrap();
        let err = r.decline(day(2099, 1, 1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(r.status, ReservationStatus::Accepted);
    }

    #[test]
    fn cancel_records_reason() {
        let mut r = sample_reservation();
        r.cancel(Some("change of plans".to_string()), day(2099, 1, 1))
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert_eq!(r.cancellation_reason.as_deref(), Some("change of plans"));
    }

    #[test]
    fn every_mutator_fails_from_terminal_states() {
        for status in [
            ReservationStatus::Accepted,
            ReservationStatus::Declined,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            let now = day(2099, 1, 1);
            let mut r = sample_reservation();
            r.status = status;

            assert!(matches!(
                r.clone().accept(now),
                Err(DomainError::InvalidState(_))
            ));
            assert!(matches!(
                r.clone().decline(now),
                Err(DomainError::InvalidState(_))
            ));
            assert!(matches!(
                r.clone().cancel(None, now),
                Err(DomainError::InvalidState(_))
            ));
            assert!(matches!(
                r.reschedule(day(2099, 3, 1), 2, 1000, now),
                Err(DomainError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn started_window_rejects_every_mutator() {
        let now = day(2099, 1, 10); // exactly the start date: not strictly future
        let mut r = sample_reservation();

        assert!(matches!(
            r.clone().accept(now),
            Err(DomainError::StaleBooking(_))
        ));
        assert!(matches!(
            r.clone().decline(now),
            Err(DomainError::StaleBooking(_))
        ));
        assert!(matches!(
            r.clone().cancel(None, now),
            Err(DomainError::StaleBooking(_))
        ));
        assert!(matches!(
            r.reschedule(day(2099, 3, 1), 2, 1000, now),
            Err(DomainError::StaleBooking(_))
        ));
        assert_eq!(r.status, ReservationStatus::Pending);
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Accepted,
            ReservationStatus::Declined,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            let parsed = ReservationStatus::try_from(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_fails_closed() {
        let err = ReservationStatus::try_from("In Progress").unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Accepted.is_terminal());
        assert!(ReservationStatus::Declined.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::Completed.is_terminal());
    }
}
