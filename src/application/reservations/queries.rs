//! Reservation read paths
//!
//! Thin queries over the repository, each gated by the same authorization
//! guard as the lifecycle methods. Every list is ordered descending by
//! `start_date`, one convention across all endpoints. Transient storage
//! failures on these reads are retried once.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::authorize::{
    authorize, authorize_listing_history, authorize_renter_history, Principal, ReservationAction,
};
use super::detail::{load_detail, load_listing, load_reservation, ReservationDetail};
use crate::domain::{DomainResult, RepositoryProvider, Reservation};
use crate::shared::clock::Clock;
use crate::shared::retry::{retry_with_backoff, RetryConfig};

pub struct ReservationQueryService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl ReservationQueryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Reservations of a listing that have not started yet. Owner only.
    pub async fn upcoming_for_listing(
        &self,
        principal: &Principal,
        listing_id: i32,
    ) -> DomainResult<Vec<ReservationDetail>> {
        let listing = load_listing(self.repos.as_ref(), listing_id).await?;
        authorize_listing_history(principal, &listing)?;

        let now = self.clock.now();
        let rows = retry_with_backoff(
            RetryConfig::default(),
            || {
                self.repos
                    .reservations()
                    .find_for_listing_starting_after(listing_id, now)
            },
            |e| e.is_transient(),
            "list_upcoming_reservations",
        )
        .await?;

        self.details(rows).await
    }

    /// Reservations of a listing whose window already started. Owner only.
    pub async fn past_for_listing(
        &self,
        principal: &Principal,
        listing_id: i32,
    ) -> DomainResult<Vec<ReservationDetail>> {
        let listing = load_listing(self.repos.as_ref(), listing_id).await?;
        authorize_listing_history(principal, &listing)?;

        let now = self.clock.now();
        let rows = retry_with_backoff(
            RetryConfig::default(),
            || {
                self.repos
                    .reservations()
                    .find_for_listing_starting_before(listing_id, now)
            },
            |e| e.is_transient(),
            "list_past_reservations",
        )
        .await?;

        self.details(rows).await
    }

    /// Everything a renter has booked. Self only.
    pub async fn for_renter(
        &self,
        principal: &Principal,
        renter_id: &str,
    ) -> DomainResult<Vec<ReservationDetail>> {
        authorize_renter_history(principal, renter_id)?;

        let rows = retry_with_backoff(
            RetryConfig::default(),
            || self.repos.reservations().find_by_renter(renter_id),
            |e| e.is_transient(),
            "list_renter_reservations",
        )
        .await?;

        self.details(rows).await
    }

    /// A single reservation. Renter, listing owner, or admin.
    pub async fn get_by_id(
        &self,
        principal: &Principal,
        reservation_id: i32,
    ) -> DomainResult<ReservationDetail> {
        let reservation = load_reservation(self.repos.as_ref(), reservation_id).await?;
        let listing = load_listing(self.repos.as_ref(), reservation.listing_id).await?;
        authorize(principal, ReservationAction::View, &reservation, &listing)?;

        load_detail(self.repos.as_ref(), reservation).await
    }

    async fn details(&self, rows: Vec<Reservation>) -> DomainResult<Vec<ReservationDetail>> {
        let mut details = Vec::with_capacity(rows.len());
        for reservation in rows {
            details.push(load_detail(self.repos.as_ref(), reservation).await?);
        }
        Ok(details)
    }
}

/// Build both reservation services over the same repositories and clock.
pub fn reservation_services(
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
) -> (super::ReservationService, ReservationQueryService) {
    (
        super::ReservationService::new(repos.clone(), clock.clone()),
        ReservationQueryService::new(repos, clock),
    )
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reservations::service::{BookingWindow, ReservationService};
    use crate::domain::{DomainError, ListingRepository, NewListing, User, UserRepository};
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;
    use crate::shared::clock::FixedClock;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn principal(id: &str) -> Principal {
        Principal {
            user_id: id.to_string(),
            is_admin: false,
        }
    }

    fn admin() -> Principal {
        Principal {
            user_id: "u-admin".to_string(),
            is_admin: true,
        }
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

    struct Fixture {
        queries: ReservationQueryService,
        listing_id: i32,
        // Reservation ids in creation order: past, near future, far future
        ids: [i32; 3],
    }

    /// One listing with three reservations: one already started, two
    /// upcoming. The booking clock sits before all three start dates; the
    /// query clock sits between the first and the second.
    async fn fixture() -> Fixture {
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
                title: "Kayak carrier".to_string(),
                description: None,
                rate_price: 500,
                is_available: true,
                created_at: day(2098, 6, 1),
            })
            .await
            .unwrap();

        let provider: Arc<dyn RepositoryProvider> = repos.clone();
        let booking = ReservationService::new(
            provider.clone(),
            Arc::new(FixedClock(day(2099, 1, 1))),
        );
        let renter = principal("u-renter");
        let mut ids = [0; 3];
        for (i, start) in [day(2099, 1, 5), day(2099, 2, 10), day(2099, 3, 20)]
            .into_iter()
            .enumerate()
        {
            let detail = booking
                .create(
                    &renter,
                    listing.id,
                    BookingWindow {
                        start_date: start,
                        duration_days: 2,
                    },
                )
                .await
                .unwrap();
            ids[i] = detail.reservation.id;
        }

        let queries =
            ReservationQueryService::new(provider, Arc::new(FixedClock(day(2099, 2, 1))));
        Fixture {
            queries,
            listing_id: listing.id,
            ids,
        }
    }

    #[tokio::test]
    async fn upcoming_filters_and_sorts_descending() {
        let f = fixture().await;

        let upcoming = f
            .queries
            .upcoming_for_listing(&principal("u-owner"), f.listing_id)
            .await
            .unwrap();

        let got: Vec<i32> = upcoming.iter().map(|d| d.reservation.id).collect();
        assert_eq!(got, vec![f.ids[2], f.ids[1]]);
        assert!(upcoming
            .iter()
            .all(|d| d.reservation.start_date > day(2099, 2, 1)));
    }

    #[tokio::test]
    async fn past_returns_only_started_windows() {
        let f = fixture().await;

        let past = f
            .queries
            .past_for_listing(&principal("u-owner"), f.listing_id)
            .await
            .unwrap();

        let got: Vec<i32> = past.iter().map(|d| d.reservation.id).collect();
        assert_eq!(got, vec![f.ids[0]]);
    }

    #[tokio::test]
    async fn listing_history_rejects_non_owners() {
        let f = fixture().await;

        for caller in [principal("u-renter"), principal("u-stranger"), admin()] {
            let err = f
                .queries
                .upcoming_for_listing(&caller, f.listing_id)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotAuthorized(_)));
        }
    }

    #[tokio::test]
    async fn renter_history_is_self_only_and_sorted() {
        let f = fixture().await;

        let mine = f
            .queries
            .for_renter(&principal("u-renter"), "u-renter")
            .await
            .unwrap();
        let got: Vec<i32> = mine.iter().map(|d| d.reservation.id).collect();
        assert_eq!(got, vec![f.ids[2], f.ids[1], f.ids[0]]);

        let err = f
            .queries
            .for_renter(&principal("u-stranger"), "u-renter")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn get_by_id_allows_renter_owner_admin_only() {
        let f = fixture().await;

        for caller in [principal("u-renter"), principal("u-owner"), admin()] {
            assert!(f.queries.get_by_id(&caller, f.ids[0]).await.is_ok());
        }

        let err = f
            .queries
            .get_by_id(&principal("u-stranger"), f.ids[0])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn get_by_id_is_idempotent() {
        let f = fixture().await;
        let caller = principal("u-renter");

        let first = f.queries.get_by_id(&caller, f.ids[1]).await.unwrap();
        let second = f.queries.get_by_id(&caller, f.ids[1]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_not_found() {
        let f = fixture().await;

        let err = f
            .queries
            .get_by_id(&principal("u-renter"), 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
