//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::reservations::{ReservationQueryService, ReservationService};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::domain::RepositoryProvider;

use super::modules::{auth, health, listings, reservations};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Listings
        listings::create_listing,
        listings::list_listings,
        listings::get_listing,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::reschedule_reservation,
        reservations::cancel_reservation,
        reservations::accept_reservation,
        reservations::decline_reservation,
        reservations::list_upcoming_reservations,
        reservations::list_past_reservations,
        reservations::list_user_reservations,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Listings", description = "Items offered for rental"),
        (name = "Reservations", description = "Booking lifecycle and history")
    ),
    info(
        title = "Rackshare API",
        version = "0.1.0",
        description = "REST API for the peer-to-peer rental marketplace",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    reservation_service: Arc<ReservationService>,
    reservation_queries: Arc<ReservationQueryService>,
    jwt_config: JwtConfig,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let auth_handler_state = auth::AuthHandlerState {
        repos: repos.clone(),
        jwt_config,
    };

    let listing_state = listings::ListingAppState {
        repos: repos.clone(),
    };

    let reservation_state = reservations::ReservationAppState {
        service: reservation_service,
        queries: reservation_queries,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    // Listing routes (public reads)
    let listing_routes = Router::new()
        .route("/", get(listings::list_listings))
        .route("/{listing_id}", get(listings::get_listing))
        .with_state(listing_state.clone());

    // Listing routes (protected writes)
    let listing_protected_routes = Router::new()
        .route("/", post(listings::create_listing))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(listing_state);

    // Reservation routes (all protected). The `{id}` segment is a listing id
    // for create/upcoming/past and a reservation id everywhere else.
    let reservation_routes = Router::new()
        .route(
            "/{id}",
            post(reservations::create_reservation)
                .get(reservations::get_reservation)
                .patch(reservations::reschedule_reservation),
        )
        .route("/{id}/upcoming", get(reservations::list_upcoming_reservations))
        .route("/{id}/past", get(reservations::list_past_reservations))
        .route("/{id}/cancel", patch(reservations::cancel_reservation))
        .route("/{id}/accept", patch(reservations::accept_reservation))
        .route("/{id}/decline", patch(reservations::decline_reservation))
        .route("/user/{user_id}", get(reservations::list_user_reservations))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(reservation_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Listings
        .nest("/api/v1/listings", listing_routes)
        .nest("/api/v1/listings", listing_protected_routes)
        // Reservations
        .nest("/api/v1/reservations", reservation_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
