pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AccountRecord, StoreProfile};
pub use repositories::{AccountRepository, MySqlAccountRepository};
pub use services::{MetadataResolver, StoreDirectory};
