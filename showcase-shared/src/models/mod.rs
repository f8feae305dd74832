pub mod destination;
pub mod movie;
pub mod numeric;
pub mod offer;

pub use destination::Destination;
pub use movie::{LikeEntry, Movie};
pub use offer::ShoeOffer;
