//! Denormalized reservation read model
//!
//! API consumers receive the reservation together with its listing and the
//! owner/renter accounts instead of raw foreign keys. Loading helpers are
//! shared by the lifecycle service and the query service.

use crate::domain::{
    DomainError, DomainResult, Listing, RepositoryProvider, Reservation, User,
};

/// A reservation joined with its listing and both parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub listing: Listing,
    pub owner: User,
    pub renter: User,
}

pub(crate) async fn load_reservation(
    repos: &dyn RepositoryProvider,
    id: i32,
) -> DomainResult<Reservation> {
    repos
        .reservations()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.to_string(),
        })
}

pub(crate) async fn load_listing(
    repos: &dyn RepositoryProvider,
    id: i32,
) -> DomainResult<Listing> {
    repos
        .listings()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Listing",
            field: "id",
            value: id.to_string(),
        })
}

pub(crate) async fn load_user(repos: &dyn RepositoryProvider, id: &str) -> DomainResult<User> {
    repos
        .users()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        })
}

/// Join a reservation with its listing, owner and renter.
pub(crate) async fn load_detail(
    repos: &dyn RepositoryProvider,
    reservation: Reservation,
) -> DomainResult<ReservationDetail> {
    let listing = load_listing(repos, reservation.listing_id).await?;
    let owner = load_user(repos, &listing.owner_id).await?;
    let renter = load_user(repos, &reservation.renter_id).await?;

    Ok(ReservationDetail {
        reservation,
        listing,
        owner,
        renter,
    })
}
