pub mod reservations;

pub use reservations::{
    authorize, pricing, BookingWindow, Principal, ReservationAction, ReservationDetail,
    ReservationQueryService, ReservationService,
};
