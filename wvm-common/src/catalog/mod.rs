//! The catalog tree: categories → venues → maps → locations

pub mod merge;
pub mod model;
pub mod mutator;
pub mod numbering;
pub mod store;
mod traverse;

pub use model::{
    Card, CardKind, Catalog, Category, LandingPageConfig, Location, Map, Offset, Payload,
    PhotoRequest, Position, RequestStatus, Venue,
};
pub use mutator::CatalogMutator;
pub use store::{CatalogStore, CatalogTransaction};
