//! Authorization guard for reservation operations
//!
//! One explicit check at the top of every lifecycle and query method, no
//! hidden wrapping. Unknown principals fall through every arm and are
//! denied: the guard fails closed.

use crate::domain::{DomainError, DomainResult, Listing, Reservation};

/// The caller's identity as established by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub is_admin: bool,
}

impl Principal {
    pub fn is_renter(&self, reservation: &Reservation) -> bool {
        reservation.renter_id == self.user_id
    }

    pub fn is_listing_owner(&self, listing: &Listing) -> bool {
        listing.is_owned_by(&self.user_id)
    }
}

/// Lifecycle and read operations a principal may attempt on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    View,
    Reschedule,
    Cancel,
    Accept,
    Decline,
}

impl std::fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::View => "view",
            Self::Reschedule => "reschedule",
            Self::Cancel => "cancel",
            Self::Accept => "accept",
            Self::Decline => "decline",
        };
        write!(f, "{}", name)
    }
}

/// Whether `principal` may perform `action` on `reservation`.
///
/// The reservation and its listing are loaded fresh by the caller right
/// before this check; authorization decisions are never cached.
pub fn authorize(
    principal: &Principal,
    action: ReservationAction,
    reservation: &Reservation,
    listing: &Listing,
) -> DomainResult<()> {
    let allowed = match action {
        ReservationAction::View => {
            principal.is_renter(reservation)
                || principal.is_listing_owner(listing)
                || principal.is_admin
        }
        ReservationAction::Reschedule | ReservationAction::Cancel => {
            principal.is_renter(reservation)
        }
        ReservationAction::Accept | ReservationAction::Decline => {
            principal.is_listing_owner(listing)
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized(format!(
            "user {} may not {} reservation {}",
            principal.user_id, action, reservation.id
        )))
    }
}

/// A listing's reservation history is visible to its owner only.
pub fn authorize_listing_history(principal: &Principal, listing: &Listing) -> DomainResult<()> {
    if principal.is_listing_owner(listing) {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized(format!(
            "user {} does not own listing {}",
            principal.user_id, listing.id
        )))
    }
}

/// A renter's bookings are visible to that renter only.
pub fn authorize_renter_history(principal: &Principal, renter_id: &str) -> DomainResult<()> {
    if principal.user_id == renter_id {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized(format!(
            "user {} may not list bookings of user {}",
            principal.user_id, renter_id
        )))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationStatus;
    use chrono::{TimeZone, Utc};

    fn principal(user_id: &str) -> Principal {
        Principal {
            user_id: user_id.to_string(),
            is_admin: false,
        }
    }

    fn admin() -> Principal {
        Principal {
            user_id: "u-admin".to_string(),
            is_admin: true,
        }
    }

    fn fixtures() -> (Reservation, Listing) {
        let start = Utc.with_ymd_and_hms(2099, 1, 10, 0, 0, 0).unwrap();
        let listing = Listing {
            id: 10,
            owner_id: "u-owner".to_string(),
            title: "Bike rack".to_string(),
            description: None,
            rate_price: 500,
            is_available: true,
            created_at: start,
        };
        let reservation = Reservation {
            id: 1,
            listing_id: 10,
            renter_id: "u-renter".to_string(),
            start_date: start,
            duration_days: 6,
            status: ReservationStatus::Pending,
            total: 3000,
            cancellation_reason: None,
            created_at: start,
        };
        (reservation, listing)
    }

    #[test]
    fn view_allows_renter_owner_and_admin() {
        let (r, l) = fixtures();
        assert!(authorize(&principal("u-renter"), ReservationAction::View, &r, &l).is_ok());
        assert!(authorize(&principal("u-owner"), ReservationAction::View, &r, &l).is_ok());
        assert!(authorize(&admin(), ReservationAction::View, &r, &l).is_ok());
        assert!(authorize(&principal("u-stranger"), ReservationAction::View, &r, &l).is_err());
    }

    #[test]
    fn cancel_and_reschedule_are_renter_only() {
        let (r, l) = fixtures();
        for action in [ReservationAction::Cancel, ReservationAction::Reschedule] {
            assert!(authorize(&principal("u-renter"), action, &r, &l).is_ok());
            assert!(authorize(&principal("u-owner"), action, &r, &l).is_err());
            assert!(authorize(&admin(), action, &r, &l).is_err());
        }
    }

    #[test]
    fn accept_and_decline_are_owner_only() {
        let (r, l) = fixtures();
        for action in [ReservationAction::Accept, ReservationAction::Decline] {
            assert!(authorize(&principal("u-owner"), action, &r, &l).is_ok());
            assert!(authorize(&principal("u-renter"), action, &r, &l).is_err());
            assert!(authorize(&principal("u-stranger"), action, &r, &l).is_err());
            assert!(authorize(&admin(), action, &r, &l).is_err());
        }
    }

    #[test]
    fn denials_carry_not_authorized_kind() {
        let (r, l) = fixtures();
        let err =
            authorize(&principal("u-stranger"), ReservationAction::Cancel, &r, &l).unwrap_err();
        assert!(matches!(err, DomainError::NotAuthorized(_)));
        assert_eq!(err.kind(), "not_authorized");
    }

    #[test]
    fn listing_history_is_owner_only() {
        let (_, l) = fixtures();
        assert!(authorize_listing_history(&principal("u-owner"), &l).is_ok());
        assert!(authorize_listing_history(&principal("u-renter"), &l).is_err());
        assert!(authorize_listing_history(&admin(), &l).is_err());
    }

    #[test]
    fn renter_history_is_self_only() {
        assert!(authorize_renter_history(&principal("u-renter"), "u-renter").is_ok());
        assert!(authorize_renter_history(&principal("u-other"), "u-renter").is_err());
        assert!(authorize_renter_history(&admin(), "u-renter").is_err());
    }
}
