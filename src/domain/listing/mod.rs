pub mod model;
pub mod repository;

pub use model::{Listing, NewListing};
pub use repository::ListingRepository;
