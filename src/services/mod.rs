// Service exports
pub mod cache;
pub mod match_store;
pub mod store;

pub use cache::{listing_key, CacheError, ListingCache};
pub use match_store::{MatchSnapshot, MatchStore, MatchStoreError};
pub use store::{DocumentStore, InMemoryStore, RestDocumentStore, StoreCollections, StoreError};
