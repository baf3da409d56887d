//! Repository provider interface
//!
//! Bundles the per-aggregate repositories behind one trait so services can
//! hold a single `Arc<dyn RepositoryProvider>`.

use crate::domain::listing::ListingRepository;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn listings(&self) -> &dyn ListingRepository;

    fn reservations(&self) -> &dyn ReservationRepository;
}
