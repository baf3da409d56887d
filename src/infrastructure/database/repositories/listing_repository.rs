//! SeaORM implementation of ListingRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set,
};

use crate::domain::listing::{Listing, ListingRepository, NewListing};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::listing;

pub struct SeaOrmListingRepository {
    db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: listing::Model) -> Listing {
    Listing {
        id: m.id,
        owner_id: m.owner_id,
        title: m.title,
        description: m.description,
        rate_price: m.rate_price,
        is_available: m.is_available,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn create(&self, new: NewListing) -> DomainResult<Listing> {
        debug!("Creating listing '{}' for {}", new.title, new.owner_id);

        let model = listing::ActiveModel {
            id: NotSet,
            owner_id: Set(new.owner_id),
            title: Set(new.title),
            description: Set(new.description),
            rate_price: Set(new.rate_price),
            is_available: Set(new.is_available),
            created_at: Set(new.created_at),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>> {
        let model = listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Listing>> {
        let models = listing::Entity::find()
            .order_by_desc(listing::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
