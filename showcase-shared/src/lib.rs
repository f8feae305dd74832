pub mod models;
pub mod pii;

pub use models::{Destination, LikeEntry, Movie, ShoeOffer};
pub use pii::Masked;
