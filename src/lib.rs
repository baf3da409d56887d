//! # Rackshare
//!
//! Peer-to-peer rental marketplace backend: users list items for others to
//! reserve for a date range.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities and repository traits
//! - **application**: The reservation lifecycle manager, query service,
//!   pricing and authorization
//! - **infrastructure**: SeaORM persistence and in-memory repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing
//! - **shared**: Errors, clock, retry helpers

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::Config;

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
