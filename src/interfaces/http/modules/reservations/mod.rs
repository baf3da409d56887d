//! Reservations module — booking lifecycle and read endpoints

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
