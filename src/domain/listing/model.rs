//! Listing domain entity

use chrono::{DateTime, Utc};

/// Item offered for time-based rental by its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: i32,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Per-day rate in the smallest currency unit (e.g. cents)
    pub rate_price: i64,
    /// Owner-controlled availability flag, unrelated to reservation state
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Listing awaiting persistence (id assigned by the repository).
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub rate_price: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}
