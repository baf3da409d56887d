//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub listing_id: i32,
    pub renter_id: String,

    /// First day of the booking window (UTC midnight)
    pub start_date: DateTimeUtc,

    /// Whole days, >= 1; the end date is derived, never stored
    pub duration_days: i64,

    /// Reservation status: Pending, Accepted, Declined, Cancelled, Completed
    pub status: String,

    /// Price snapshot in the smallest currency unit
    pub total: i64,

    #[sea_orm(nullable)]
    pub cancellation_reason: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id"
    )]
    Listing,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RenterId",
        to = "super::user::Column::Id"
    )]
    Renter,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
