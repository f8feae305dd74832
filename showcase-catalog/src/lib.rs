//! Catalog item kinds and the pure operations the front-ends run on them.

pub mod destination;
pub mod item;
pub mod movie;
pub mod offer;

pub use item::{decode, decode_all, draft_for, owned, search, view, CatalogItem, OwnerKey, Record, Viewed};
