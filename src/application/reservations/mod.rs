//! Reservation subsystem
//!
//! - `service`: lifecycle manager (create / reschedule / accept / decline / cancel)
//! - `queries`: read paths (by listing, by renter, by id)
//! - `pricing`: total charge from per-day rate and duration
//! - `authorize`: principal checks gating every operation

pub mod authorize;
pub mod detail;
pub mod pricing;
pub mod queries;
pub mod service;

pub use authorize::{Principal, ReservationAction};
pub use detail::ReservationDetail;
pub use queries::ReservationQueryService;
pub use service::{BookingWindow, ReservationService};
