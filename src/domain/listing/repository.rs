//! Listing repository interface

use async_trait::async_trait;

use super::model::{Listing, NewListing};
use crate::domain::DomainResult;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing, returning it with its assigned id
    async fn create(&self, new: NewListing) -> DomainResult<Listing>;

    /// Find listing by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>>;

    /// All listings, newest first
    async fn find_all(&self) -> DomainResult<Vec<Listing>>;
}
