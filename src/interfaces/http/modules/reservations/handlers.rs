//! Reservation HTTP handlers
//!
//! Thin layer over the lifecycle manager and the query service: parse the
//! request, build the principal, map domain errors to statuses. Successful
//! lifecycle transitions answer 201, the contract existing consumers
//! already depend on.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::{parse_start_date, BookingRequest, CancelRequest, ReservationDto};
use crate::application::reservations::{
    BookingWindow, ReservationQueryService, ReservationService,
};
use crate::auth::middleware::AuthenticatedUser;
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService>,
    pub queries: Arc<ReservationQueryService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;
type CreatedResult<T> =
    Result<(StatusCode, Json<ApiResponse<T>>), (StatusCode, Json<ApiResponse<T>>)>;

fn window(request: &BookingRequest) -> Result<BookingWindow, crate::domain::DomainError> {
    Ok(BookingWindow {
        start_date: parse_start_date(&request.start_date)?,
        duration_days: request.duration,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{listing_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("listing_id" = i32, Path, description = "Listing to book")),
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Self-booking or invalid window"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<BookingRequest>,
) -> CreatedResult<ReservationDto> {
    let window = window(&request).map_err(domain_error)?;

    let detail = state
        .service
        .create(&user.principal(), listing_id, window)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(detail))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Reservation rescheduled", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Caller is not the renter"),
        (status = 409, description = "Not pending, or window already started")
    )
)]
pub async fn reschedule_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<BookingRequest>,
) -> CreatedResult<ReservationDto> {
    let window = window(&request).map_err(domain_error)?;

    let detail = state
        .service
        .reschedule(&user.principal(), reservation_id, window)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(detail))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{reservation_id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    request_body = CancelRequest,
    responses(
        (status = 201, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Caller is not the renter"),
        (status = 409, description = "Not pending, or window already started")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<i32>,
    body: Result<Json<CancelRequest>, JsonRejection>,
) -> CreatedResult<ReservationDto> {
    // The reason is optional, and so is the body itself.
    let reason = body
        .ok()
        .and_then(|Json(b)| b.cancellation_reason);

    let detail = state
        .service
        .cancel(&user.principal(), reservation_id, reason)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(detail))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{reservation_id}/accept",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 201, description = "Reservation accepted", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Caller is not the listing owner"),
        (status = 409, description = "Not pending, or window already started")
    )
)]
pub async fn accept_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<i32>,
) -> CreatedResult<ReservationDto> {
    let detail = state
        .service
        .accept(&user.principal(), reservation_id)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(detail))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{reservation_id}/decline",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 201, description = "Reservation declined", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Caller is not the listing owner"),
        (status = 409, description = "Not pending, or window already started")
    )
)]
pub async fn decline_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<i32>,
) -> CreatedResult<ReservationDto> {
    let detail = state
        .service
        .decline(&user.principal(), reservation_id)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(detail))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Caller is not renter, owner or admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<i32>,
) -> HandlerResult<ReservationDto> {
    let detail = state
        .queries
        .get_by_id(&user.principal(), reservation_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(ReservationDto::from(detail))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{listing_id}/upcoming",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("listing_id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Upcoming reservations, most recent start first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 401, description = "Caller is not the listing owner")
    )
)]
pub async fn list_upcoming_reservations(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<i32>,
) -> HandlerResult<Vec<ReservationDto>> {
    let details = state
        .queries
        .upcoming_for_listing(&user.principal(), listing_id)
        .await
        .map_err(domain_error)?;

    let dtos = details.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{listing_id}/past",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("listing_id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Past reservations, most recent start first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 401, description = "Caller is not the listing owner")
    )
)]
pub async fn list_past_reservations(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<i32>,
) -> HandlerResult<Vec<ReservationDto>> {
    let details = state
        .queries
        .past_for_listing(&user.principal(), listing_id)
        .await
        .map_err(domain_error)?;

    let dtos = details.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/user/{user_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "Renter user ID")),
    responses(
        (status = 200, description = "The renter's reservations, most recent start first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 401, description = "Caller is not that user")
    )
)]
pub async fn list_user_reservations(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> HandlerResult<Vec<ReservationDto>> {
    let details = state
        .queries
        .for_renter(&user.principal(), &user_id)
        .await
        .map_err(domain_error)?;

    let dtos = details.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
