//! In-memory repositories for development and testing
//!
//! Same contracts as the SeaORM implementations, including the
//! compare-and-swap semantics of `update_if_pending`: the status check and
//! the write happen under one `DashMap` entry lock.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::listing::{Listing, ListingRepository, NewListing};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};

// ── Users ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let duplicate = self
            .users
            .iter()
            .any(|entry| entry.value().email == user.email);
        if duplicate {
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }
}

// ── Listings ───────────────────────────────────────────────────

pub struct InMemoryListingRepository {
    listings: DashMap<i32, Listing>,
    counter: AtomicI32,
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self {
            listings: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, new: NewListing) -> DomainResult<Listing> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let listing = Listing {
            id,
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            rate_price: new.rate_price,
            is_available: new.is_available,
            created_at: new.created_at,
        };
        self.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>> {
        Ok(self.listings.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Listing>> {
        let mut all: Vec<Listing> = self
            .listings
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(all)
    }
}

// ── Reservations ───────────────────────────────────────────────

pub struct InMemoryReservationRepository {
    reservations: DashMap<i32, Reservation>,
    counter: AtomicI32,
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self {
            reservations: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl InMemoryReservationRepository {
    fn sorted_desc(&self, mut rows: Vec<Reservation>) -> Vec<Reservation> {
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        rows
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let reservation = Reservation {
            id,
            listing_id: new.listing_id,
            renter_id: new.renter_id,
            start_date: new.start_date,
            duration_days: new.duration_days,
            status: ReservationStatus::Pending,
            total: new.total,
            cancellation_reason: None,
            created_at: new.created_at,
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn update_if_pending(&self, r: &Reservation) -> DomainResult<bool> {
        // The entry lock makes the status check and the write one atomic step.
        match self.reservations.get_mut(&r.id) {
            Some(mut entry) if entry.value().is_pending() => {
                *entry.value_mut() = r.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_for_listing_starting_after(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let rows = self
            .reservations
            .iter()
            .filter(|e| e.value().listing_id == listing_id && e.value().start_date > instant)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_desc(rows))
    }

    async fn find_for_listing_starting_before(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let rows = self
            .reservations
            .iter()
            .filter(|e| e.value().listing_id == listing_id && e.value().start_date < instant)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_desc(rows))
    }

    async fn find_by_renter(&self, renter_id: &str) -> DomainResult<Vec<Reservation>> {
        let rows = self
            .reservations
            .iter()
            .filter(|e| e.value().renter_id == renter_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_desc(rows))
    }
}

// ── Provider ───────────────────────────────────────────────────

/// All three repositories over process-local maps.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    listings: InMemoryListingRepository,
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn listings(&self) -> &dyn ListingRepository {
        &self.listings
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn new_reservation(listing_id: i32, start: DateTime<Utc>) -> NewReservation {
        NewReservation {
            listing_id,
            renter_id: "u-renter".to_string(),
            start_date: start,
            duration_days: 2,
            total: 1000,
            created_at: day(2099, 1, 1),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_pending_status() {
        let repo = InMemoryReservationRepository::default();
        let a = repo.create(new_reservation(1, day(2099, 2, 1))).await.unwrap();
        let b = repo.create(new_reservation(1, day(2099, 3, 1))).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn update_if_pending_rejects_settled_rows() {
        let repo = InMemoryReservationRepository::default();
        let mut r = repo.create(new_reservation(1, day(2099, 2, 1))).await.unwrap();

        r.status = ReservationStatus::Accepted;
        assert!(repo.update_if_pending(&r).await.unwrap());

        // Row is no longer Pending: a second transition must lose.
        let mut again = r.clone();
        again.status = ReservationStatus::Declined;
        assert!(!repo.update_if_pending(&again).await.unwrap());
        assert!(!repo.update_if_pending(&again).await.unwrap());

        let stored = repo.find_by_id(r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Accepted);
    }

    #[tokio::test]
    async fn update_if_pending_unknown_row_is_false() {
        let repo = InMemoryReservationRepository::default();
        let ghost = Reservation {
            id: 404,
            listing_id: 1,
            renter_id: "u-renter".to_string(),
            start_date: day(2099, 2, 1),
            duration_days: 2,
            status: ReservationStatus::Pending,
            total: 1000,
            cancellation_reason: None,
            created_at: day(2099, 1, 1),
        };
        assert!(!repo.update_if_pending(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = InMemoryUserRepository::default();
        let user = User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_admin: false,
            created_at: day(2099, 1, 1),
        };
        repo.create(user.clone()).await.unwrap();

        let mut dup = user;
        dup.id = "u-2".to_string();
        let err = repo.create(dup).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
