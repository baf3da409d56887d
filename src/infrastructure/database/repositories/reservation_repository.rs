//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        id: m.id,
        listing_id: m.listing_id,
        renter_id: m.renter_id,
        start_date: m.start_date,
        duration_days: m.duration_days,
        status: ReservationStatus::try_from(m.status.as_str())?,
        total: m.total,
        cancellation_reason: m.cancellation_reason,
        created_at: m.created_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        debug!(
            "Creating reservation for listing {} by {}",
            new.listing_id, new.renter_id
        );

        let model = reservation::ActiveModel {
            id: NotSet,
            listing_id: Set(new.listing_id),
            renter_id: Set(new.renter_id),
            start_date: Set(new.start_date),
            duration_days: Set(new.duration_days),
            status: Set(ReservationStatus::Pending.as_str().to_string()),
            total: Set(new.total),
            cancellation_reason: Set(None),
            created_at: Set(new.created_at),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update_if_pending(&self, r: &Reservation) -> DomainResult<bool> {
        debug!("Updating reservation {} -> {}", r.id, r.status);

        // One conditional UPDATE: the status filter and the write commit
        // atomically, so a row that already left Pending is never touched.
        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::StartDate, Expr::value(r.start_date))
            .col_expr(
                reservation::Column::DurationDays,
                Expr::value(r.duration_days),
            )
            .col_expr(
                reservation::Column::Status,
                Expr::value(r.status.as_str()),
            )
            .col_expr(reservation::Column::Total, Expr::value(r.total))
            .col_expr(
                reservation::Column::CancellationReason,
                Expr::value(r.cancellation_reason.clone()),
            )
            .filter(reservation::Column::Id.eq(r.id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected == 1)
    }

    async fn find_for_listing_starting_after(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::ListingId.eq(listing_id))
            .filter(reservation::Column::StartDate.gt(instant))
            .order_by_desc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_listing_starting_before(
        &self,
        listing_id: i32,
        instant: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::ListingId.eq(listing_id))
            .filter(reservation::Column::StartDate.lt(instant))
            .order_by_desc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_by_renter(&self, renter_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::RenterId.eq(renter_id))
            .order_by_desc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
