//! Reservation lifecycle manager
//!
//! Owns every mutation of a reservation: create, reschedule, accept,
//! decline, cancel. Each method authorizes the caller first, then applies
//! the domain transition and commits it with a compare-and-swap update so
//! concurrent transitions against the same reservation serialize. The
//! losing caller observes `InvalidState` instead of silently overwriting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::authorize::{authorize, Principal, ReservationAction};
use super::detail::{load_detail, load_listing, load_reservation, ReservationDetail};
use super::pricing;
use crate::domain::{DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation};
use crate::shared::clock::Clock;

/// Requested booking window for create and reschedule.
#[derive(Debug, Clone, Copy)]
pub struct BookingWindow {
    /// First day of the rental, UTC midnight
    pub start_date: DateTime<Utc>,
    /// Whole days, >= 1
    pub duration_days: i64,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Book a listing. The renter must not be the listing's owner and the
    /// duration must be at least one day; the total is snapshotted from the
    /// listing's current rate.
    pub async fn create(
        &self,
        principal: &Principal,
        listing_id: i32,
        window: BookingWindow,
    ) -> DomainResult<ReservationDetail> {
        let listing = load_listing(self.repos.as_ref(), listing_id).await?;

        if listing.is_owned_by(&principal.user_id) {
            return Err(DomainError::Validation(format!(
                "owner of listing {} cannot book their own listing",
                listing_id
            )));
        }

        let quote = pricing::quote(window.duration_days, &listing)?;

        let reservation = self
            .repos
            .reservations()
            .create(NewReservation {
                listing_id,
                renter_id: principal.user_id.clone(),
                start_date: window.start_date,
                duration_days: quote.duration_days,
                total: quote.total,
                created_at: self.clock.now(),
            })
            .await?;

        info!(
            reservation_id = reservation.id,
            listing_id,
            renter_id = %reservation.renter_id,
            total = reservation.total,
            "Reservation created"
        );

        load_detail(self.repos.as_ref(), reservation).await
    }

    /// Move a pending booking to a new window. Renter only; the guard runs
    /// against the window as it was before the update, so a booking whose
    /// window already began cannot be rewritten.
    pub async fn reschedule(
        &self,
        principal: &Principal,
        reservation_id: i32,
        window: BookingWindow,
    ) -> DomainResult<ReservationDetail> {
        let mut reservation = load_reservation(self.repos.as_ref(), reservation_id).await?;
        let listing = load_listing(self.repos.as_ref(), reservation.listing_id).await?;
        authorize(principal, ReservationAction::Reschedule, &reservation, &listing)?;

        let quote = pricing::quote(window.duration_days, &listing)?;
        reservation.reschedule(
            window.start_date,
            quote.duration_days,
            quote.total,
            self.clock.now(),
        )?;

        let detail = self.commit_transition(reservation).await?;
        info!(
            reservation_id,
            total = detail.reservation.total,
            "Reservation rescheduled"
        );
        Ok(detail)
    }

    /// Listing owner approves a pending request.
    pub async fn accept(
        &self,
        principal: &Principal,
        reservation_id: i32,
    ) -> DomainResult<ReservationDetail> {
        let mut reservation = load_reservation(self.repos.as_ref(), reservation_id).await?;
        let listing = load_listing(self.repos.as_ref(), reservation.listing_id).await?;
        authorize(principal, ReservationAction::Accept, &reservation, &listing)?;

        reservation.accept(self.clock.now())?;

        let detail = self.commit_transition(reservation).await?;
        info!(reservation_id, "Reservation accepted");
        Ok(detail)
    }

    /// Listing owner rejects a pending request.
    pub async fn decline(
        &self,
        principal: &Principal,
        reservation_id: i32,
    ) -> DomainResult<ReservationDetail> {
        let mut reservation = load_reservation(self.repos.as_ref(), reservation_id).await?;
        let listing = load_listing(self.repos.as_ref(), reservation.listing_id).await?;
        authorize(principal, ReservationAction::Decline, &reservation, &listing)?;

        reservation.decline(self.clock.now())?;

        let detail = self.commit_transition(reservation).await?;
        info!(reservation_id, "Reservation declined");
        Ok(detail)
    }

    /// Renter withdraws a pending request.
    pub async fn cancel(
        &self,
        principal: &Principal,
        reservation_id: i32,
        reason: Option<String>,
    ) -> DomainResult<ReservationDetail> {
        let mut reservation = load_reservation(self.repos.as_ref(), reservation_id).await?;
        let listing = load_listing(self.repos.as_ref(), reservation.listing_id).await?;
        authorize(principal, ReservationAction::Cancel, &reservation, &listing)?;

        reservation.cancel(reason, self.clock.now())?;

        let detail = self.commit_transition(reservation).await?;
        info!(reservation_id, "Reservation cancelled");
        Ok(detail)
    }

    /// Persist a transition. The repository only writes if the stored row is
    /// still `Pending`; losing a race is reported as `InvalidState`.
    async fn commit_transition(&self, reservation: Reservation) -> DomainResult<ReservationDetail> {
        let won = self
            .repos
            .reservations()
            .update_if_pending(&reservation)
            .await?;

        if !won {
            return Err(DomainError::InvalidState(format!(
                "reservation {} left Pending concurrently",
                reservation.id
            )));
        }

        load_detail(self.repos.as_ref(), reservation).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Listing, ListingRepository, NewListing, ReservationStatus, User, UserRepository,
    };
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;
    use crate::shared::clock::FixedClock;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn user(id: &str, is_admin: bool) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            is_admin,
            created_at: day(2098, 1, 1),
        }
    }

    fn principal(id: &str) -> Principal {
        Principal {
            user_id: id.to_string(),
            is_admin: false,
        }
    }

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        service: ReservationService,
        listing: Listing,
    }

    /// Seeded world: owner + renter + admin accounts, one listing at
    /// 500/day, clock pinned to 2099-01-01.
    async fn fixture() -> Fixture {
        fixture_at(day(2099, 1, 1)).await
    }

    async fn fixture_at(now: DateTime<Utc>) -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        for account in [
            user("u-owner", false),
            user("u-renter", false),
            user("u-stranger", false),
            user("u-admin", true),
        ] {
            repos.users().create(account).await.unwrap();
        }
        let listing = repos
            .listings()
            .create(NewListing {
                owner_id: "u-owner".to_string(),
                title: "Thule roof rack".to_string(),
                description: Some("Fits most crossbars".to_string()),
                rate_price: 500,
                is_available: true,
                created_at: day(2098, 6, 1),
            })
            .await
            .unwrap();

        let service = ReservationService::new(repos.clone(), Arc::new(FixedClock(now)));
        Fixture {
            repos,
            service,
            listing,
        }
    }

    fn window(start: DateTime<Utc>, duration_days: i64) -> BookingWindow {
        BookingWindow {
            start_date: start,
            duration_days,
        }
    }

    #[tokio::test]
    async fn create_yields_pending_reservation_with_snapshot_total() {
        let f = fixture().await;

        let detail = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        let r = &detail.reservation;
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.total, 3000);
        assert_eq!(r.end_date(), day(2099, 1, 16));
        assert_eq!(r.renter_id, "u-renter");
        assert_eq!(detail.owner.id, "u-owner");
        assert_eq!(detail.renter.id, "u-renter");
    }

    #[tokio::test]
    async fn owner_cannot_book_own_listing() {
        let f = fixture().await;

        let err = f
            .service
            .create(&principal("u-owner"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_zero_duration() {
        let f = fixture().await;

        let err = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_unknown_listing_is_not_found() {
        let f = fixture().await;

        let err = f
            .service
            .create(&principal("u-renter"), 999, window(day(2099, 1, 10), 6))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn reschedule_recomputes_total_and_window() {
        let f = fixture().await;
        let renter = principal("u-renter");
        let created = f
            .service
            .create(&renter, f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        let updated = f
            .service
            .reschedule(&renter, created.reservation.id, window(day(2099, 2, 1), 3))
            .await
            .unwrap();

        let r = &updated.reservation;
        assert_eq!(r.total, 1500);
        assert_eq!(r.end_date(), day(2099, 2, 4));
        assert_eq!(r.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn reschedule_is_renter_only() {
        let f = fixture().await;
        let created = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        for caller in ["u-owner", "u-stranger", "u-admin"] {
            let err = f
                .service
                .reschedule(
                    &principal(caller),
                    created.reservation.id,
                    window(day(2099, 2, 1), 3),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotAuthorized(_)), "{}", caller);
        }
    }

    #[tokio::test]
    async fn cancel_records_reason() {
        let f = fixture().await;
        let renter = principal("u-renter");
        let created = f
            .service
            .create(&renter, f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        let cancelled = f
            .service
            .cancel(
                &renter,
                created.reservation.id,
                Some("change of plans".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(cancelled.reservation.status, ReservationStatus::Cancelled);
        assert_eq!(
            cancelled.reservation.cancellation_reason.as_deref(),
            Some("change of plans")
        );
    }

    #[tokio::test]
    async fn accept_then_decline_is_invalid_state() {
        let f = fixture().await;
        let owner = principal("u-owner");
        let created = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        let accepted = f.service.accept(&owner, created.reservation.id).await.unwrap();
        assert_eq!(accepted.reservation.status, ReservationStatus::Accepted);

        let err = f
            .service
            .decline(&owner, created.reservation.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn accept_and_decline_reject_everyone_but_the_owner() {
        let f = fixture().await;
        let created = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();

        for caller in ["u-renter", "u-stranger", "u-admin"] {
            let err = f
                .service
                .accept(&principal(caller), created.reservation.id)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotAuthorized(_)), "{}", caller);

            let err = f
                .service
                .decline(&principal(caller), created.reservation.id)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotAuthorized(_)), "{}", caller);
        }
    }

    #[tokio::test]
    async fn started_window_blocks_all_mutators_even_for_right_principals() {
        // Booked while the window was still ahead, then the clock passes it.
        let f = fixture().await;
        let renter = principal("u-renter");
        let created = f
            .service
            .create(&renter, f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();
        let id = created.reservation.id;

        let late = ReservationService::new(
            f.repos.clone(),
            Arc::new(FixedClock(day(2099, 1, 20))),
        );

        let owner = principal("u-owner");
        assert!(matches!(
            late.accept(&owner, id).await.unwrap_err(),
            DomainError::StaleBooking(_)
        ));
        assert!(matches!(
            late.decline(&owner, id).await.unwrap_err(),
            DomainError::StaleBooking(_)
        ));
        assert!(matches!(
            late.cancel(&renter, id, None).await.unwrap_err(),
            DomainError::StaleBooking(_)
        ));
        assert!(matches!(
            late.reschedule(&renter, id, window(day(2099, 3, 1), 2))
                .await
                .unwrap_err(),
            DomainError::StaleBooking(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_accepts_serialize_to_one_winner() {
        let f = fixture().await;
        let created = f
            .service
            .create(&principal("u-renter"), f.listing.id, window(day(2099, 1, 10), 6))
            .await
            .unwrap();
        let id = created.reservation.id;

        let service = Arc::new(f.service);
        let owner = principal("u-owner");

        let a = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            async move { service.accept(&owner, id).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            async move { service.accept(&owner, id).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::InvalidState(_))))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(losers, 1);
    }
}
