pub mod models;
pub mod repositories;

pub use models::PeriodAggregate;
pub use repositories::{MetricsRepository, MySqlMetricsRepository};
