//! Listings module — rental items offered by their owners

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
