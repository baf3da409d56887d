//! Listing HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use super::dto::{CreateListingRequest, ListingDto};
use crate::auth::middleware::AuthenticatedUser;
use crate::domain::{DomainError, Listing, NewListing, RepositoryProvider};
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};

/// Application state for listing handlers.
#[derive(Clone)]
pub struct ListingAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

impl ListingAppState {
    async fn to_dto(&self, listing: Listing) -> Result<ListingDto, DomainError> {
        let owner = self
            .repos
            .users()
            .find_by_id(&listing.owner_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: listing.owner_id.clone(),
            })?;
        Ok(ListingDto::from_parts(listing, owner))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<ListingDto>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_listing(
    State(state): State<ListingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ListingDto>>), (StatusCode, Json<ApiResponse<ListingDto>>)>
{
    let listing = state
        .repos
        .listings()
        .create(NewListing {
            owner_id: user.user_id.clone(),
            title: request.title,
            description: request.description,
            rate_price: request.rate_price,
            is_available: request.is_available,
            created_at: Utc::now(),
        })
        .await
        .map_err(domain_error)?;

    tracing::info!(listing_id = listing.id, owner_id = %user.user_id, "Listing created");

    let dto = state.to_dto(listing).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    responses(
        (status = 200, description = "All listings", body = ApiResponse<Vec<ListingDto>>)
    )
)]
pub async fn list_listings(
    State(state): State<ListingAppState>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, (StatusCode, Json<ApiResponse<Vec<ListingDto>>>)> {
    let listings = state
        .repos
        .listings()
        .find_all()
        .await
        .map_err(domain_error)?;

    let mut dtos = Vec::with_capacity(listings.len());
    for listing in listings {
        dtos.push(state.to_dto(listing).await.map_err(domain_error)?);
    }

    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{listing_id}",
    tag = "Listings",
    params(("listing_id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ApiResponse<ListingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_listing(
    State(state): State<ListingAppState>,
    Path(listing_id): Path<i32>,
) -> Result<Json<ApiResponse<ListingDto>>, (StatusCode, Json<ApiResponse<ListingDto>>)> {
    let listing = state
        .repos
        .listings()
        .find_by_id(listing_id)
        .await
        .map_err(domain_error)?;

    let Some(listing) = listing else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Listing {} not found",
                listing_id
            ))),
        ));
    };

    let dto = state.to_dto(listing).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(dto)))
}
