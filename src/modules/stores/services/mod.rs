pub mod metadata_resolver;

pub use metadata_resolver::{resolve_metadata, resolve_regions, MetadataResolver, StoreDirectory};
