pub mod store_profile;

pub use store_profile::{AccountRecord, StoreMetadata, StoreProfile, StoreRegion};
