pub mod listing;
pub mod repositories;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use listing::{Listing, ListingRepository, NewListing};
pub use repositories::RepositoryProvider;
pub use reservation::{NewReservation, Reservation, ReservationRepository, ReservationStatus};
pub use user::{User, UserRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
