//! Route tables of the three catalog front-ends.

pub mod auth;
pub mod crud;
pub mod destinations;
pub mod movies;
pub mod shoeshelf;

pub use destinations::Destinations;
pub use movies::Movies;
pub use shoeshelf::ShoeShelf;
