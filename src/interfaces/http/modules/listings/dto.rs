//! Listing DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Listing, User};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: Option<String>,
    /// Per-day rate in the smallest currency unit
    #[validate(range(min = 1, message = "rate_price must be positive"))]
    pub rate_price: i64,
    /// Defaults to available
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Owner identity embedded in listing responses
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerSummaryDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for OwnerSummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Listing details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub rate_price: i64,
    pub is_available: bool,
    pub created_at: String,
    pub owner: OwnerSummaryDto,
}

impl ListingDto {
    pub fn from_parts(listing: Listing, owner: User) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            description: listing.description,
            rate_price: listing.rate_price,
            is_available: listing.is_available,
            created_at: listing.created_at.to_rfc3339(),
            owner: OwnerSummaryDto::from(owner),
        }
    }
}
